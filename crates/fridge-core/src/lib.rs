pub mod clock;
pub mod config;
pub mod events;
pub mod focus;
pub mod kitchen_queue;
pub mod reducer;
pub mod state;

pub use clock::*;
pub use config::*;
pub use events::*;
pub use focus::*;
pub use kitchen_queue::*;
pub use reducer::*;
pub use state::*;
