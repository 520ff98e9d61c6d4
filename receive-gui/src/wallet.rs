use std::sync::atomic::{AtomicUsize, Ordering};

use image::{
    imageops::{self, FilterType},
    Rgba, RgbaImage,
};
use qrcode::QrCode;
use receive::{Address, AddressSource, Balance, BalanceStore, EncodedImage};

const DARK: Rgba<u8> = Rgba([0, 0, 0, 255]);
const LIGHT: Rgba<u8> = Rgba([255, 255, 255, 255]);

/// Wallet used by the GUI: a fixed list of receive addresses and an in-memory balance.
///
/// Each deposit marks the current address as used, so the next one is handed out, wrapping
/// around at the end of the list.
#[derive(Debug)]
pub struct DemoWallet {
    addresses: Vec<Address>,
    used: AtomicUsize,
    balances: BalanceStore,
    qr_size: u32,
}

impl DemoWallet {
    pub fn new(addresses: Vec<String>, qr_size: u32) -> Self {
        Self {
            addresses: addresses.into_iter().map(Address::new).collect(),
            used: AtomicUsize::new(0),
            balances: BalanceStore::with_balance(0),
            qr_size,
        }
    }

    pub fn balances(&self) -> &BalanceStore {
        &self.balances
    }

    pub fn balance(&self) -> Balance {
        self.balances.balance().unwrap_or(0)
    }

    /// Receive `amount` on the current address.
    ///
    /// The address is only marked as used if the balance actually moved, otherwise no
    /// observer would hear about it and would keep showing it.
    pub fn deposit(&self, amount: Balance) -> Balance {
        let current = self.balance();
        let balance = current.saturating_add(amount);
        if balance == current {
            tracing::warn!(
                "Deposit of {} leaves the balance at {}, address not used",
                amount,
                balance
            );
            return balance;
        }
        let used = self.used.fetch_add(1, Ordering::SeqCst) + 1;
        if used % self.addresses.len().max(1) == 0 {
            tracing::warn!("Demo wallet ran out of fresh addresses, reusing the first one");
        }
        tracing::info!("Demo wallet received {}, balance is now {}", amount, balance);
        self.balances.set_balance(balance);
        balance
    }

    /// Send `amount` away. The receive address does not change.
    #[cfg(test)]
    pub fn spend(&self, amount: Balance) -> Balance {
        let balance = self.balance().saturating_sub(amount);
        self.balances.set_balance(balance);
        balance
    }
}

impl AddressSource for DemoWallet {
    fn current_address(&self) -> Address {
        let index = self.used.load(Ordering::SeqCst) % self.addresses.len().max(1);
        self.addresses
            .get(index)
            .cloned()
            .unwrap_or_else(|| Address::new(""))
    }

    fn encode(&self, address: &Address) -> EncodedImage {
        qr_raster(address.as_str(), self.qr_size)
    }
}

/// Rasterise `data` as a black on white QR code, scaled to a `dimension` pixels square.
pub fn qr_raster(data: &str, dimension: u32) -> EncodedImage {
    let code = match QrCode::new(data.as_bytes()) {
        Ok(code) => code,
        Err(e) => {
            tracing::error!("Failed to encode '{}' as a QR code: {}", data, e);
            let blank = RgbaImage::from_pixel(dimension, dimension, LIGHT);
            return EncodedImage::from_rgba(dimension, blank.into_raw());
        }
    };
    let modules = code
        .render::<Rgba<u8>>()
        .dark_color(DARK)
        .light_color(LIGHT)
        .module_dimensions(1, 1)
        .build();
    let img = imageops::resize(&modules, dimension, dimension, FilterType::Nearest);
    EncodedImage::from_rgba(dimension, img.into_raw())
}
