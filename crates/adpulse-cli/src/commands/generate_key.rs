use clap::Args;

use adpulse_core::CredentialCipher;

/// Prints a fresh hex-encoded 32-byte key for `ADPULSE_ENCRYPTION_KEY`
#[derive(Args)]
pub struct GenerateKeyCommand {}

impl GenerateKeyCommand {
    pub fn execute(self) -> anyhow::Result<()> {
        println!("{}", CredentialCipher::generate_key());
        Ok(())
    }
}
