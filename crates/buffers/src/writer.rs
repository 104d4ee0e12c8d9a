//! Binary buffer writer with auto-growing capacity.

/// A binary buffer writer that grows automatically as needed.
///
/// Multi-byte words are written little-endian, matching the BJSON wire
/// layout.
///
/// # Example
///
/// ```
/// use bjson_buffers::Writer;
///
/// let mut writer = Writer::new();
/// writer.u32(0x0102);
/// let data = writer.flush();
/// assert_eq!(data, [0x02, 0x01, 0x00, 0x00]);
/// ```
pub struct Writer {
    /// The underlying byte buffer.
    buf: Vec<u8>,
    /// Position where the last flush happened.
    x0: usize,
    /// Current cursor position.
    x: usize,
    /// Allocation size when the buffer needs to grow.
    alloc_size: usize,
}

impl Default for Writer {
    fn default() -> Self {
        Self::new()
    }
}

impl Writer {
    /// Creates a new writer with the default allocation size (16KB).
    pub fn new() -> Self {
        Self::with_alloc_size(16 * 1024)
    }

    /// Creates a new writer with a custom allocation size.
    pub fn with_alloc_size(alloc_size: usize) -> Self {
        Self {
            buf: vec![0u8; alloc_size],
            x0: 0,
            x: 0,
            alloc_size,
        }
    }

    /// Ensures the buffer has at least `capacity` bytes available.
    pub fn ensure_capacity(&mut self, capacity: usize) {
        let remaining = self.buf.len() - self.x;
        if remaining < capacity {
            let used = self.x - self.x0;
            let required = used + capacity;
            let new_size = if required <= self.alloc_size {
                self.alloc_size
            } else {
                required * 2
            };
            let mut grown = vec![0u8; new_size];
            grown[..used].copy_from_slice(&self.buf[self.x0..self.x]);
            self.buf = grown;
            self.x = used;
            self.x0 = 0;
        }
    }

    /// Resets the flush position so the next flush starts here.
    pub fn reset(&mut self) {
        self.x0 = self.x;
    }

    /// Returns the bytes written since the last flush and advances the
    /// flush position.
    pub fn flush(&mut self) -> Vec<u8> {
        let out = self.buf[self.x0..self.x].to_vec();
        self.x0 = self.x;
        out
    }

    /// Number of bytes written since the last flush.
    pub fn written(&self) -> usize {
        self.x - self.x0
    }

    /// Writes an unsigned 8-bit integer.
    #[inline]
    pub fn u8(&mut self, val: u8) {
        self.ensure_capacity(1);
        self.buf[self.x] = val;
        self.x += 1;
    }

    /// Writes an unsigned 32-bit integer (little-endian).
    #[inline]
    pub fn u32(&mut self, val: u32) {
        self.ensure_capacity(4);
        self.buf[self.x..self.x + 4].copy_from_slice(&val.to_le_bytes());
        self.x += 4;
    }

    /// Writes a signed 32-bit integer (little-endian).
    #[inline]
    pub fn i32(&mut self, val: i32) {
        self.u32(val as u32);
    }

    /// Writes a 32-bit floating point number (little-endian bit pattern).
    #[inline]
    pub fn f32(&mut self, val: f32) {
        self.u32(val.to_bits());
    }

    /// Writes a byte slice.
    pub fn buf(&mut self, bytes: &[u8]) {
        self.ensure_capacity(bytes.len());
        self.buf[self.x..self.x + bytes.len()].copy_from_slice(bytes);
        self.x += bytes.len();
    }

    /// Writes a UTF-8 string. Returns the number of bytes written.
    pub fn utf8(&mut self, s: &str) -> usize {
        self.buf(s.as_bytes());
        s.len()
    }
}
