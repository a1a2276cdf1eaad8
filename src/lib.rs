//! arena - terminal front end for the model battle and site analyzer

pub mod render;
