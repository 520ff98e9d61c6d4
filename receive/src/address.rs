use std::sync::Arc;

/// A receiving address, as displayed to the user.
///
/// The value is opaque to this crate: it is never parsed nor validated, and a new address
/// always replaces the previous one wholesale.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Address(String);

impl Address {
    pub fn new(address: impl Into<String>) -> Self {
        Self(address.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for Address {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Scannable visual representation of an [`Address`]: a square RGBA raster.
#[derive(Clone, PartialEq, Eq)]
pub struct EncodedImage {
    dimension: u32,
    rgba: Arc<[u8]>,
}

impl EncodedImage {
    /// `rgba` must hold `dimension * dimension` pixels of 4 bytes each.
    pub fn from_rgba(dimension: u32, rgba: Vec<u8>) -> Self {
        debug_assert_eq!(rgba.len(), (dimension as usize).pow(2) * 4);
        Self {
            dimension,
            rgba: rgba.into(),
        }
    }

    pub fn dimension(&self) -> u32 {
        self.dimension
    }

    pub fn rgba(&self) -> &[u8] {
        &self.rgba
    }
}

impl std::fmt::Debug for EncodedImage {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        f.debug_struct("EncodedImage")
            .field("dimension", &self.dimension)
            .field("bytes", &self.rgba.len())
            .finish()
    }
}

/// Where the session gets its receiving address from.
///
/// Both calls are synchronous and expected to always succeed.
pub trait AddressSource: Send + Sync {
    /// The address currently valid for receiving funds.
    fn current_address(&self) -> Address;
    /// Encode the address into a square raster of a fixed dimension.
    fn encode(&self, address: &Address) -> EncodedImage;
}
