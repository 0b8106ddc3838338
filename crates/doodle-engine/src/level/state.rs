/// Number of collectible stars per level.
pub const MAX_STARS: usize = 3;

/// Progress flags for the level being played.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LevelState {
    number: u32,
    goal_reached: bool,
    stars: [bool; MAX_STARS],
}

impl LevelState {
    pub fn new(number: u32) -> Self {
        Self {
            number,
            goal_reached: false,
            stars: [false; MAX_STARS],
        }
    }

    pub fn number(&self) -> u32 {
        self.number
    }

    pub fn goal_reached(&self) -> bool {
        self.goal_reached
    }

    pub fn set_goal_reached(&mut self) {
        self.goal_reached = true;
    }

    /// Mark star `index` collected. Returns false for an out-of-range index
    /// or a star that was already collected.
    pub fn collect_star(&mut self, index: usize) -> bool {
        match self.stars.get_mut(index) {
            Some(star) if !*star => {
                *star = true;
                true
            }
            _ => false,
        }
    }

    pub fn stars(&self) -> &[bool; MAX_STARS] {
        &self.stars
    }

    pub fn stars_collected(&self) -> usize {
        self.stars.iter().filter(|s| **s).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fresh_level_has_nothing_collected() {
        let state = LevelState::new(4);
        assert_eq!(state.number(), 4);
        assert!(!state.goal_reached());
        assert_eq!(state.stars_collected(), 0);
    }

    #[test]
    fn stars_are_collected_once() {
        let mut state = LevelState::new(1);
        assert!(state.collect_star(1));
        assert!(!state.collect_star(1));
        assert!(!state.collect_star(MAX_STARS));
        assert_eq!(state.stars(), &[false, true, false]);
        assert_eq!(state.stars_collected(), 1);
    }
}
