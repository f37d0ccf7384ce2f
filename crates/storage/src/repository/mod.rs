mod golfer;
mod team;
mod tournament;
mod tournament_golfer;

pub use golfer::GolferRepository;
pub use team::TeamRepository;
pub use tournament::TournamentRepository;
pub use tournament_golfer::TournamentGolferRepository;
