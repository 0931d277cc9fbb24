/// The game is always played by this many teams.
pub const TEAM_COUNT: usize = 3;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Team {
    pub name: String,
}

impl Team {
    pub fn new(name: String) -> Self {
        Team { name }
    }
}
