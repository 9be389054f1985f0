//! Entrance-count reconciliation for a single template instance.

use crate::error::GenerationError;
use crate::rng::DungeonRng;
use crate::types::Pos;

use super::mapping::ENTRANCE_CODE;
use super::placement::CompiledTemplate;

/// Enforces the template's entrance limits on a freshly instantiated block.
///
/// Excess entrances are picked at random and recolored to the template's
/// fallback code. Returns the surviving entrances relative to the block's
/// top-left corner, in row-major order.
pub(super) fn reconcile_entrances(
    compiled: &CompiledTemplate<'_>,
    instance: &mut [u8],
    rng: &mut DungeonRng,
) -> Result<Vec<Pos>, GenerationError> {
    let template = compiled.template;
    let width = compiled.width();
    let mut entrances: Vec<Pos> = instance
        .iter()
        .enumerate()
        .filter(|(_, code)| **code == ENTRANCE_CODE)
        .map(|(index, _)| Pos { y: (index / width) as i32, x: (index % width) as i32 })
        .collect();

    if entrances.len() < template.min_entrances as usize {
        return Err(GenerationError::EntranceCount {
            template: template.name.clone(),
            found: entrances.len(),
            minimum: template.min_entrances,
        });
    }

    while entrances.len() > template.max_entrances as usize {
        let removed = entrances.remove(rng.index(entrances.len()));
        instance[(removed.y as usize) * width + (removed.x as usize)] = compiled.fallback_code;
    }

    Ok(entrances)
}
