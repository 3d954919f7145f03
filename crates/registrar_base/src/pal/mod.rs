/* 📖 # What is the Platform Abstraction Layer?

The PAL is the only place that touches the outside world: reading the configuration
file and serving HTTP. The engine talks to the `Pal` trait, so tests can run the whole
API against MockPal without binding sockets or creating files.
*/

mod file_path;
pub mod http;
pub mod mock;
pub mod real_pal;
mod traits;

pub use file_path::FilePath;
pub use mock::MockPal;
pub use real_pal::RealPal;
pub use traits::{Pal, PalHandle};
