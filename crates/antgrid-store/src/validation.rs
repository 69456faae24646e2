#![forbid(unsafe_code)]

//! Pure validation helpers used before any intent is emitted.

use antgrid_core::{CellCoord, GridSize, Rule};

use crate::error::{ConfigChangeError, ValidationError};

/// Smallest tick interval the server accepts, in milliseconds.
pub const MIN_TICK_INTERVAL_MS: u32 = 10;

/// Reject positions outside `[0, width) × [0, height)`.
pub fn validate_position(position: CellCoord, grid: GridSize) -> Result<(), ValidationError> {
    if grid.contains(position) {
        Ok(())
    } else {
        Err(ValidationError::OutOfBounds { position, grid })
    }
}

/// A rule list is well-formed when it is non-empty, every color parses as a
/// hex color, and no two rules share a `currentColor` (compared by value).
pub fn validate_rules(rules: &[Rule]) -> Result<(), ValidationError> {
    if rules.is_empty() {
        return Err(ValidationError::EmptyRules);
    }
    for (index, rule) in rules.iter().enumerate() {
        for color in [&rule.current_color, &rule.new_color] {
            if !color.is_valid() {
                return Err(ValidationError::InvalidRuleColor {
                    index,
                    color: color.clone(),
                });
            }
        }
        if rules[..index]
            .iter()
            .any(|earlier| earlier.current_color.same_as(&rule.current_color))
        {
            return Err(ValidationError::DuplicateCurrentColor {
                index,
                color: rule.current_color.clone(),
            });
        }
    }
    Ok(())
}

/// Gate for `UPDATE_GAME_CONFIG`.
pub fn validate_config_change(
    ant_count: usize,
    grid_size: u32,
    tick_interval: u32,
) -> Result<(), ConfigChangeError> {
    if ant_count > 0 {
        return Err(ConfigChangeError::AntsPresent { count: ant_count });
    }
    if grid_size < 1 {
        return Err(ConfigChangeError::GridSizeTooSmall {
            requested: grid_size,
        });
    }
    if tick_interval < MIN_TICK_INTERVAL_MS {
        return Err(ConfigChangeError::TickIntervalTooShort {
            requested: tick_interval,
            minimum: MIN_TICK_INTERVAL_MS,
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use antgrid_core::{Color, TurnDirection};

    #[test]
    fn position_bounds() {
        let grid = GridSize::new(50, 50);
        assert!(validate_position(CellCoord::new(0, 0), grid).is_ok());
        assert!(validate_position(CellCoord::new(49, 49), grid).is_ok());
        assert!(validate_position(CellCoord::new(50, 0), grid).is_err());
        assert!(validate_position(CellCoord::new(0, 50), grid).is_err());
        assert!(validate_position(CellCoord::new(-1, 5), grid).is_err());
    }

    #[test]
    fn default_rules_are_valid() {
        assert_eq!(validate_rules(&Rule::default_set(&Color::from("#3b82f6"))), Ok(()));
    }

    #[test]
    fn empty_rules_rejected() {
        assert_eq!(validate_rules(&[]), Err(ValidationError::EmptyRules));
    }

    #[test]
    fn bad_color_rejected() {
        let rules = [Rule::new("#FFFFFF", "blue", TurnDirection::Left)];
        assert!(matches!(
            validate_rules(&rules),
            Err(ValidationError::InvalidRuleColor { index: 0, .. })
        ));
    }

    #[test]
    fn duplicate_current_color_rejected_across_spellings() {
        let rules = [
            Rule::new("#FFFFFF", "#ff0000", TurnDirection::Left),
            Rule::new("#fff", "#00ff00", TurnDirection::Right),
        ];
        assert!(matches!(
            validate_rules(&rules),
            Err(ValidationError::DuplicateCurrentColor { index: 1, .. })
        ));
    }

    #[test]
    fn config_change_gates() {
        assert_eq!(
            validate_config_change(2, 100, 250),
            Err(ConfigChangeError::AntsPresent { count: 2 })
        );
        assert!(validate_config_change(0, 0, 250).is_err());
        assert!(validate_config_change(0, 10, 9).is_err());
        assert_eq!(validate_config_change(0, 1, 10), Ok(()));
    }
}
