//! Procedural obstacle generation
//!
//! Ground obstacles spell out the brand name in order; flying obstacles are
//! drawn at random. Gaps shrink and double spawns become likelier as the
//! score climbs.

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::state::ColorClass::{Contrast, Primary};
use super::state::{ColorClass, Field, Obstacle, ObstacleKind};
use crate::consts::*;
use crate::tuning::Tuning;

/// Shape and styling shared by every obstacle of one kind
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ObstacleTemplate {
    pub glyph: char,
    pub kind: ObstacleKind,
    pub color: ColorClass,
}

impl ObstacleTemplate {
    const fn ground(glyph: char, color: ColorClass) -> Self {
        Self {
            glyph,
            kind: ObstacleKind::Ground,
            color,
        }
    }

    const fn flying(glyph: char, color: ColorClass) -> Self {
        Self {
            glyph,
            kind: ObstacleKind::Flying,
            color,
        }
    }

    /// Base (unscaled) size
    pub fn base_size(&self) -> (f32, f32) {
        match self.kind {
            ObstacleKind::Ground => GROUND_OBSTACLE_SIZE,
            ObstacleKind::Flying => FLYING_OBSTACLE_SIZE,
        }
    }
}

/// "TEDxImScience", one letter per ground obstacle
pub const GROUND_SEQUENCE: [ObstacleTemplate; 13] = [
    ObstacleTemplate::ground('T', Primary),
    ObstacleTemplate::ground('E', Primary),
    ObstacleTemplate::ground('D', Primary),
    ObstacleTemplate::ground('x', Contrast),
    ObstacleTemplate::ground('I', Primary),
    ObstacleTemplate::ground('m', Primary),
    ObstacleTemplate::ground('S', Contrast),
    ObstacleTemplate::ground('c', Primary),
    ObstacleTemplate::ground('i', Contrast),
    ObstacleTemplate::ground('e', Primary),
    ObstacleTemplate::ground('n', Contrast),
    ObstacleTemplate::ground('c', Primary),
    ObstacleTemplate::ground('e', Contrast),
];

pub const FLYING_TEMPLATES: [ObstacleTemplate; 3] = [
    ObstacleTemplate::flying('X', Primary),
    ObstacleTemplate::flying('x', Contrast),
    ObstacleTemplate::flying('✕', Primary),
];

/// Position in [`GROUND_SEQUENCE`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ObstacleSequenceCursor {
    index: usize,
}

impl ObstacleSequenceCursor {
    pub fn index(&self) -> usize {
        self.index
    }

    /// Template under the cursor, then step forward (wrapping)
    pub fn advance(&mut self) -> ObstacleTemplate {
        let template = GROUND_SEQUENCE[self.index];
        self.index = (self.index + 1) % GROUND_SEQUENCE.len();
        template
    }
}

/// Frame gap bounds for the next spawn
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GapRange {
    pub min: f32,
    pub max: f32,
}

/// Gap bounds at `score`: both shrink linearly to their floors and stay
/// at least `gap_variety` apart
pub fn gap_range(score: u32, tuning: &Tuning) -> GapRange {
    let shrink = score as f32 * tuning.gap_decrease_rate;
    let min = (tuning.min_gap - shrink).max(tuning.min_gap_floor);
    let max = (tuning.max_gap - shrink).max(tuning.max_gap_floor);
    GapRange {
        min,
        max: max.max(min + tuning.gap_variety),
    }
}

/// Draw this tick's gap threshold and compare against frames since the last spawn
pub fn spawn_due<R: Rng + ?Sized>(
    frames_since_spawn: u64,
    score: u32,
    tuning: &Tuning,
    rng: &mut R,
) -> bool {
    let range = gap_range(score, tuning);
    let threshold = if range.max > range.min {
        rng.random_range(range.min..range.max)
    } else {
        range.min
    };
    frames_since_spawn as f32 > threshold
}

/// Probability of a twin obstacle: 0 until the start score, linear up to the
/// cap at the full score
pub fn double_spawn_chance(score: u32, tuning: &Tuning) -> f32 {
    if score < tuning.double_spawn_start {
        return 0.0;
    }
    let ramp = (score - tuning.double_spawn_start) as f32
        / (tuning.double_spawn_full - tuning.double_spawn_start) as f32;
    (ramp * tuning.double_spawn_max_chance).min(tuning.double_spawn_max_chance)
}

/// Pick the next template: a random flyer, or the next letter in sequence
pub fn choose_template<R: Rng + ?Sized>(
    cursor: &mut ObstacleSequenceCursor,
    tuning: &Tuning,
    rng: &mut R,
) -> ObstacleTemplate {
    if rng.random::<f32>() < tuning.flying_chance {
        FLYING_TEMPLATES[rng.random_range(0..FLYING_TEMPLATES.len())]
    } else {
        cursor.advance()
    }
}

/// Build an obstacle from `template` at horizontal position `x`
pub fn place<R: Rng + ?Sized>(
    template: ObstacleTemplate,
    x: f32,
    field: &Field,
    rng: &mut R,
) -> Obstacle {
    let (w, h) = template.base_size();
    let width = w * field.scale;
    let height = h * field.scale;
    let ground = field.ground_level();

    let y = match template.kind {
        ObstacleKind::Flying => {
            let altitude = FLYING_ALTITUDES[rng.random_range(0..FLYING_ALTITUDES.len())];
            ground - altitude * field.scale
        }
        ObstacleKind::Ground => ground - height,
    };

    Obstacle {
        pos: Vec2::new(x, y),
        width,
        height,
        kind: template.kind,
        color: template.color,
        glyph: template.glyph,
        passed: false,
    }
}

/// Generate one spawn event at the right edge: one obstacle, sometimes two
pub fn spawn_obstacles<R: Rng + ?Sized>(
    obstacles: &mut Vec<Obstacle>,
    cursor: &mut ObstacleSequenceCursor,
    field: &Field,
    score: u32,
    tuning: &Tuning,
    rng: &mut R,
) -> usize {
    let template = choose_template(cursor, tuning, rng);
    obstacles.push(place(template, field.width, field, rng));

    let chance = double_spawn_chance(score, tuning);
    if chance > 0.0 && rng.random::<f32>() < chance {
        obstacles.push(place(template, field.width + DOUBLE_SPAWN_OFFSET, field, rng));
        log::debug!("Double spawn '{}' at score {}", template.glyph, score);
        return 2;
    }
    1
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    #[test]
    fn test_sequence_spells_brand() {
        let word: String = GROUND_SEQUENCE.iter().map(|t| t.glyph).collect();
        assert_eq!(word, "TEDxImScience");
    }

    #[test]
    fn test_cursor_wraps() {
        let mut cursor = ObstacleSequenceCursor::default();
        let first: Vec<char> = (0..13).map(|_| cursor.advance().glyph).collect();
        assert_eq!(cursor.index(), 0);
        let second: Vec<char> = (0..13).map(|_| cursor.advance().glyph).collect();
        assert_eq!(first, second);
    }

    #[test]
    fn test_gap_range_shrinks_to_floors() {
        let tuning = Tuning::default();
        assert_eq!(gap_range(0, &tuning), GapRange { min: 120.0, max: 350.0 });
        assert_eq!(gap_range(20, &tuning), GapRange { min: 100.0, max: 330.0 });
        assert_eq!(gap_range(1000, &tuning), GapRange { min: 80.0, max: 300.0 });
        for score in 0..2000 {
            let range = gap_range(score, &tuning);
            assert!(range.max >= range.min + tuning.gap_variety);
            assert!(range.min >= tuning.min_gap_floor);
        }
    }

    #[test]
    fn test_gap_variety_survives_floor_clamp() {
        let tuning = Tuning {
            min_gap_floor: 280.0,
            min_gap: 320.0,
            max_gap: 340.0,
            max_gap_floor: 290.0,
            ..Default::default()
        };
        let range = gap_range(500, &tuning);
        assert_eq!(range.min, 280.0);
        assert_eq!(range.max, 330.0);
    }

    #[test]
    fn test_spawn_never_due_inside_min_gap() {
        let tuning = Tuning::default();
        let mut rng = Pcg32::seed_from_u64(3);
        for _ in 0..1000 {
            assert!(!spawn_due(120, 0, &tuning, &mut rng));
        }
        for _ in 0..1000 {
            assert!(spawn_due(351, 0, &tuning, &mut rng));
        }
    }

    #[test]
    fn test_double_spawn_chance_ramp() {
        let tuning = Tuning::default();
        assert_eq!(double_spawn_chance(0, &tuning), 0.0);
        assert_eq!(double_spawn_chance(10, &tuning), 0.0);
        assert!((double_spawn_chance(40, &tuning) - 0.3).abs() < 1e-6);
        assert!((double_spawn_chance(70, &tuning) - 0.6).abs() < 1e-6);
        assert!((double_spawn_chance(5000, &tuning) - 0.6).abs() < 1e-6);
    }

    fn sample_pairs(score: u32, trials: usize, seed: u64) -> usize {
        let tuning = Tuning::default();
        let field = Field::new(1280.0, 720.0);
        let mut rng = Pcg32::seed_from_u64(seed);
        let mut cursor = ObstacleSequenceCursor::default();
        let mut pairs = 0;
        for _ in 0..trials {
            let mut obstacles = Vec::new();
            if spawn_obstacles(&mut obstacles, &mut cursor, &field, score, &tuning, &mut rng) == 2 {
                pairs += 1;
            }
        }
        pairs
    }

    #[test]
    fn test_no_pairs_at_score_ten() {
        assert_eq!(sample_pairs(10, 10_000, 11), 0);
        assert_eq!(sample_pairs(3, 10_000, 12), 0);
    }

    #[test]
    fn test_pair_rate_saturates() {
        let trials = 20_000;
        for score in [70, 200, 4000] {
            let rate = sample_pairs(score, trials, score as u64) as f32 / trials as f32;
            assert!((rate - 0.6).abs() < 0.03, "score {score}: pair rate {rate}");
        }
        let mid = sample_pairs(40, trials, 40) as f32 / trials as f32;
        assert!((mid - 0.3).abs() < 0.03, "score 40: pair rate {mid}");
    }

    #[test]
    fn test_twin_matches_template() {
        let tuning = Tuning::default();
        let field = Field::new(1280.0, 720.0);
        let mut rng = Pcg32::seed_from_u64(99);
        let mut cursor = ObstacleSequenceCursor::default();
        let mut seen_pair = false;
        for _ in 0..200 {
            let mut obstacles = Vec::new();
            if spawn_obstacles(&mut obstacles, &mut cursor, &field, 100, &tuning, &mut rng) == 2 {
                let (a, b) = (&obstacles[0], &obstacles[1]);
                assert_eq!(a.glyph, b.glyph);
                assert_eq!(a.kind, b.kind);
                assert_eq!(a.color, b.color);
                assert_eq!(a.pos.x, field.width);
                assert_eq!(b.pos.x, field.width + DOUBLE_SPAWN_OFFSET);
                seen_pair = true;
            }
        }
        assert!(seen_pair);
    }

    #[test]
    fn test_placement_heights() {
        let field = Field::new(1280.0, 720.0);
        let ground = field.ground_level();
        let mut rng = Pcg32::seed_from_u64(5);

        let rock = place(GROUND_SEQUENCE[0], 1280.0, &field, &mut rng);
        assert_eq!(rock.pos.y + rock.height, ground);
        assert_eq!((rock.width, rock.height), (35.0, 50.0));

        for _ in 0..50 {
            let bird = place(FLYING_TEMPLATES[0], 1280.0, &field, &mut rng);
            assert!(bird.pos.y == ground - 65.0 || bird.pos.y == ground - 55.0);
            assert_eq!((bird.width, bird.height), (40.0, 35.0));
        }
    }

    #[test]
    fn test_placement_scales_on_phone() {
        let field = Field::new(400.0, 700.0);
        let mut rng = Pcg32::seed_from_u64(5);
        let rock = place(GROUND_SEQUENCE[0], 400.0, &field, &mut rng);
        assert!((rock.width - 24.5).abs() < 1e-4);
        assert!((rock.height - 35.0).abs() < 1e-4);
    }

    #[test]
    fn test_flying_share_is_roughly_35_percent() {
        let tuning = Tuning::default();
        let mut rng = Pcg32::seed_from_u64(17);
        let mut cursor = ObstacleSequenceCursor::default();
        let trials = 20_000;
        let flying = (0..trials)
            .filter(|_| choose_template(&mut cursor, &tuning, &mut rng).kind == ObstacleKind::Flying)
            .count();
        let share = flying as f32 / trials as f32;
        assert!((share - 0.35).abs() < 0.02, "flying share {share}");
    }
}
