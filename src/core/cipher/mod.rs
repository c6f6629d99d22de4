//! Document encryption.
//!
//! The vault is sealed as a whole with asymmetric envelope encryption. The
//! rest of the crate only sees [`Cipher::seal`] and [`Cipher::open`], so the
//! scheme can change without touching the vault model.

use zeroize::Zeroizing;

use crate::error::Result;

mod age;

pub use self::age::{parse_recipient, Age};

/// Envelope encryption backend.
pub trait Cipher {
    /// Type representing a recipient public key.
    type Recipient;

    /// Type representing a private identity/key.
    type Identity;

    /// Encrypt a document for every recipient.
    ///
    /// # Errors
    ///
    /// Returns `CipherError` if encryption fails.
    fn seal(&self, plaintext: &[u8], recipients: &[Self::Recipient]) -> Result<String>;

    /// Decrypt a sealed document with a private identity.
    ///
    /// # Errors
    ///
    /// Returns `CipherError` if the ciphertext is malformed or the identity
    /// does not match any recipient.
    fn open(&self, sealed: &str, identity: &Self::Identity) -> Result<Zeroizing<Vec<u8>>>;

    /// Backend name for display/config.
    fn name(&self) -> &'static str;
}
