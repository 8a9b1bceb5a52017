//! Temporary names used to break rename cycles.
//!
//! A factory only proposes candidates; the synthesizer owns the bounded retry
//! loop and the "must not exist, must not be a graph node" check. Tests inject
//! deterministic factories (any `FnMut(&Path) -> PathBuf` qualifies).

use rand::Rng;
use std::path::{Path, PathBuf};

use crate::naming::counters::to_radix;

/// Candidates tried before giving up with `TempNameExhausted`.
pub const TEMP_NAME_ATTEMPTS: usize = 3;

const RANDOM_LOW: u64 = 0x0FFF_FFFF_FFFF_FFFF;
const RANDOM_RADIX: u32 = 36;

/// Source of candidate placeholder paths inside `dir`.
pub trait TempNameFactory {
    fn candidate(&mut self, dir: &Path) -> PathBuf;
}

impl<F> TempNameFactory for F
where
    F: FnMut(&Path) -> PathBuf,
{
    fn candidate(&mut self, dir: &Path) -> PathBuf {
        self(dir)
    }
}

/// Random base-36 names drawn from a 64-bit range (12-13 characters).
#[derive(Debug, Default)]
pub struct RandomTempNames;

impl TempNameFactory for RandomTempNames {
    fn candidate(&mut self, dir: &Path) -> PathBuf {
        let num: u64 = rand::thread_rng().gen_range(RANDOM_LOW..=u64::MAX);
        dir.join(to_radix(num, RANDOM_RADIX, false))
    }
}
