use num_bigint::BigInt;

#[derive(thiserror::Error, Debug)]
pub enum BgnError {
    /// Error when trying to find a modular inverse that doesn't exist.
    #[error("NoInverse: {0}")]
    NoInverse(String),
    /// Error when creating a field with an invalid modulus (p <= 1).
    #[error("InvalidModulus: {0}")]
    InvalidModulus(String),
    #[error("InternalError: {0}")]
    InternalError(String),

    #[error("InvalidParameters: {0}")]
    InvalidParameters(String),
    #[error("Key size must be an even number of bits >= 16, got {0}")]
    InvalidKeySize(usize),
    #[error("Message space {message_space} must be strictly below both secret primes")]
    MessageSpaceTooLarge { message_space: u64 },
    #[error("Message {value} is outside the message space [-{bound}, {bound}]")]
    MessageOutOfRange { value: BigInt, bound: u64 },

    #[error("Randomness source failed: {0}")]
    Randomness(String),
    #[error("Prime generation failed: {0}")]
    PrimeGeneration(String),

    #[error("Decryption tables have not been precomputed for this key")]
    TablesNotPrecomputed,
    #[error("Decryption tables were built for message space {built}, key uses {expected}")]
    StaleTables { built: u64, expected: u64 },
    #[error("Decryption failed: {0}")]
    DecryptionFailed(String),

    /// Scheme misuse, e.g. multiplying a ciphertext that is already level 2.
    #[error("LevelViolation: {0}")]
    LevelViolation(String),

    #[error("Invalid pairing descriptor: {0}")]
    InvalidDescriptor(String),
    #[error("Invalid element encoding: {0}")]
    InvalidElement(String),
    #[error("No data provided")]
    EmptyInput,

    #[error("Public key lock poisoned")]
    LockPoisoned,

    #[error("Data serialization: {0}")]
    SerializationError(#[from] bincode::Error),
}
