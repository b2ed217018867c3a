pub mod learnset;
pub mod moves;
pub mod pokedex;
