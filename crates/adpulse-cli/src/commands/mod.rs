pub mod generate_key;
pub mod migrate;
pub mod serve;

pub use generate_key::GenerateKeyCommand;
pub use migrate::MigrateCommand;
pub use serve::ServeCommand;
