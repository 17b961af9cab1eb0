use thiserror::Error;

/// Invalid universe layout.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MapError {
    #[error("universes per output must be at least 1")]
    ZeroUniversesPerOutput,
    #[error("{outputs} outputs exceed the supported maximum of {max}")]
    TooManyOutputs { outputs: u16, max: u16 },
    #[error(
        "{pixels} pixels per output need more than {universes} universe(s) ({addressable} addressable pixels)"
    )]
    NotEnoughUniverses {
        pixels: usize,
        universes: u16,
        addressable: usize,
    },
    #[error("last universe {last} exceeds the 16-bit universe range")]
    UniverseOverflow { last: u32 },
}
