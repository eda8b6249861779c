use rand::{Rng, RngCore};

use crate::game::MoveSelector;
use crate::navigator::Path;

/// Uniformly random choice among the offered paths. Seeding the RNG
/// outside keeps whole games replayable.
#[derive(Debug, Default, Clone, Copy)]
pub struct RandomSelector;

impl MoveSelector for RandomSelector {
    fn select_path(&self, paths: &[Path], rng: &mut dyn RngCore) -> Option<usize> {
        if paths.is_empty() {
            None
        } else {
            Some(rng.gen_range(0..paths.len()))
        }
    }
}
