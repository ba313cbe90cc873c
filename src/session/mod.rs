mod state;

pub use state::Session;
