pub mod app;
pub mod config;
pub mod dir;
pub mod logger;
pub mod share;
pub mod view;
pub mod wallet;

use receive::Version;

pub const VERSION: Version = Version {
    major: 1,
    minor: 0,
    patch: 0,
};

#[cfg(test)]
mod tests {
    #[test]
    fn gui_version() {
        // receive-gui major version should always be superior or equal to the library one.
        assert!(super::VERSION.major >= receive::VERSION.major);
    }
}
