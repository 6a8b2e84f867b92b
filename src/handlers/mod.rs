pub mod auth;
pub mod draft;
pub mod reaction;
pub mod solution;

pub use auth::{get_current_user, login, logout, signup};
pub use draft::{delete_draft, list_drafts, save_draft};
pub use reaction::{list_reactions, toggle_reaction};
pub use solution::{
    create_solution, delete_solution, get_solution, list_solutions, update_solution,
};
