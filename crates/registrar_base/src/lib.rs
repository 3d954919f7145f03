/* 📖 # Why have registrar_base as a core library?
registrar_base holds the error type, tracing setup and the platform abstraction layer
(files and HTTP) shared by the engine and the binary. Keeping them here lets the engine
stay free of sockets and file system calls, so it can be tested against MockPal.
*/

pub mod error;
pub mod pal;
pub mod tracing;

// Re-export commonly used types for convenience
pub use error::{RegistrarError, RegistrarResult, ResultExt};
pub use pal::{FilePath, MockPal, Pal, PalHandle, RealPal};
