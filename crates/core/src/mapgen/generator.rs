//! Floor construction from templates: terrain codes, instance selection,
//! placement, entrance limits, then corridors along a spanning tree of entrances.

use std::cmp::Reverse;
use std::iter::repeat_n;

use crate::error::GenerationError;
use crate::rng::DungeonRng;
use crate::template::Template;
use crate::types::Pos;

use super::entrances::reconcile_entrances;
use super::mapping::{EMPTY_CODE, TerrainMapping, WALL_CODE};
use super::model::{Corridor, Floor, FloorConfig, PlacedRoom};
use super::pathfinding::shortest_path;
use super::placement::{CompiledTemplate, Occupancy, stamp};
use super::spanning::minimum_spanning_tree;

pub struct FloorGenerator<'a> {
    config: FloorConfig,
    templates: &'a [Template],
}

impl<'a> FloorGenerator<'a> {
    pub fn new(config: FloorConfig, templates: &'a [Template]) -> Self {
        Self { config, templates }
    }

    pub fn generate(&self, rng: &mut DungeonRng) -> Result<Floor, GenerationError> {
        let FloorConfig { height, width } = self.config;
        if height < 3 || width < 3 {
            return Err(GenerationError::FloorTooSmall { height, width });
        }
        for template in self.templates {
            template.validate()?;
        }

        let mut mapping = TerrainMapping::build(self.templates)?;
        let compiled = self
            .templates
            .iter()
            .map(|template| CompiledTemplate::compile(template, &mut mapping))
            .collect::<Result<Vec<_>, _>>()?;

        let candidates = select_instances(&compiled, self.config, rng);

        let mut codes = vec![WALL_CODE; width * height];
        let mut occupancy = Occupancy::with_border(width, height);
        let mut rooms = Vec::with_capacity(candidates.len());
        let mut entrances = Vec::new();

        for candidate in candidates {
            let (room_height, room_width) = (candidate.height(), candidate.width());
            let offsets = occupancy.free_offsets(room_height, room_width);
            if offsets.is_empty() {
                return Err(GenerationError::Placement {
                    template: candidate.template.name.clone(),
                });
            }
            let offset = offsets[rng.index(offsets.len())];

            let mut instance = candidate.instantiate(rng);
            let local_entrances = reconcile_entrances(candidate, &mut instance, rng)?;

            stamp(&mut codes, width, offset, &instance, room_width);
            occupancy.claim(offset, room_height, room_width);
            entrances.extend(
                local_entrances.into_iter().map(|local| local.offset(offset.y, offset.x)),
            );
            tracing::debug!(
                template = %candidate.template.name,
                y = offset.y,
                x = offset.x,
                "placed template instance"
            );
            rooms.push(PlacedRoom {
                template: candidate.template.name.clone(),
                offset,
                height: room_height,
                width: room_width,
            });
        }

        let (corridors, unreachable) = carve_corridors(&mut codes, width, height, &entrances);

        tracing::info!(
            rooms = rooms.len(),
            entrances = entrances.len(),
            corridors = corridors.len(),
            unreachable = unreachable.len(),
            "floor generated"
        );

        Ok(Floor { height, width, codes, mapping, rooms, entrances, corridors, unreachable })
    }
}

/// Draws an instance count per template and orders the expanded candidates so
/// templates with the highest mandatory count are placed first.
///
/// A count is capped one above the number of copies the floor interior could
/// hold, so an impossible request still ends in a placement failure.
fn select_instances<'t, 'a>(
    compiled: &'t [CompiledTemplate<'a>],
    config: FloorConfig,
    rng: &mut DungeonRng,
) -> Vec<&'t CompiledTemplate<'a>> {
    let interior = config.height.saturating_sub(2) * config.width.saturating_sub(2);
    let mut candidates = Vec::new();
    for template in compiled {
        let count =
            rng.range_inclusive(template.template.min_instances, template.template.max_instances);
        let area = (template.height() * template.width()).max(1);
        let count = (count as usize).min(interior / area + 1);
        tracing::debug!(template = %template.template.name, count, "selected instance count");
        candidates.extend(repeat_n(template, count));
    }
    candidates.sort_by_key(|candidate| Reverse(candidate.template.min_instances));
    candidates
}

fn carve_corridors(
    codes: &mut [u8],
    width: usize,
    height: usize,
    entrances: &[Pos],
) -> (Vec<Corridor>, Vec<(Pos, Pos)>) {
    let mut corridors = Vec::new();
    let mut unreachable = Vec::new();
    for (from, to) in minimum_spanning_tree(entrances) {
        let path = shortest_path(width, height, from, to, |_| false);
        if path.is_empty() {
            tracing::warn!(?from, ?to, "no corridor path between entrances, rooms left unlinked");
            unreachable.push((from, to));
            continue;
        }
        for pos in &path {
            codes[(pos.y as usize) * width + (pos.x as usize)] = EMPTY_CODE;
        }
        corridors.push(Corridor { from, to, path });
    }
    (corridors, unreachable)
}
