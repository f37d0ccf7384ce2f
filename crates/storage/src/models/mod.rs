mod golfer;
mod normalized_name;
mod team;
mod tournament;
mod tournament_golfer;

pub use golfer::{Golfer, GolferUpdate, NewGolfer, normalize_country};
pub use normalized_name::NormalizedGolferName;
pub use team::Team;
pub use tournament::{
    FINAL_ROUND, FINISHED_ROUND, Tournament, TournamentPatch, TournamentStatus, UnknownStatus,
};
pub use tournament_golfer::{Participant, TournamentGolfer};
