use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_OUT_DIR: &str = "static/gen1";
pub const DEFAULT_BASE_URL: &str = "https://pokemondb.net";
pub const DEFAULT_SPRITE_BASE_URL: &str = "https://img.pokemondb.net";

pub const GENERATION: u8 = 1;
const SPRITE_SET: &str = "firered-leafgreen";

pub const POKEMON_FILE: &str = "pokemon.json";
pub const MOVES_FILE: &str = "moves.json";
pub const LEARNSETS_FILE: &str = "learnsets.csv";
pub const IMAGES_DIR: &str = "images";

/// Where to read from and where to write to.
#[derive(Debug, Clone)]
pub struct Config {
    pub out_dir: PathBuf,
    pub base_url: String,
    pub sprite_base_url: String,
    pub delay: Duration,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            out_dir: PathBuf::from(DEFAULT_OUT_DIR),
            base_url: DEFAULT_BASE_URL.to_string(),
            sprite_base_url: DEFAULT_SPRITE_BASE_URL.to_string(),
            delay: Duration::ZERO,
        }
    }
}

impl Config {
    pub fn moves_url(&self) -> String {
        format!("{}/move/generation/{}", trim(&self.base_url), GENERATION)
    }

    pub fn pokedex_url(&self) -> String {
        format!("{}/pokedex/all", trim(&self.base_url))
    }

    /// The site's slugs match our identifiers, including `nidoran-f` and `mr-mime`.
    pub fn learnset_url(&self, identifier: &str) -> String {
        format!(
            "{}/pokedex/{}/moves/{}",
            trim(&self.base_url),
            identifier,
            GENERATION
        )
    }

    pub fn sprite_url(&self, identifier: &str) -> String {
        format!(
            "{}/sprites/{}/normal/{}.png",
            trim(&self.sprite_base_url),
            SPRITE_SET,
            identifier
        )
    }

    pub fn pokemon_path(&self) -> PathBuf {
        self.out_dir.join(POKEMON_FILE)
    }

    pub fn moves_path(&self) -> PathBuf {
        self.out_dir.join(MOVES_FILE)
    }

    pub fn learnsets_path(&self) -> PathBuf {
        self.out_dir.join(LEARNSETS_FILE)
    }

    pub fn images_dir(&self) -> PathBuf {
        self.out_dir.join(IMAGES_DIR)
    }

    pub fn sprite_path(&self, pokemon_id: u32) -> PathBuf {
        self.images_dir().join(format!("{}.png", pokemon_id))
    }
}

fn trim(base: &str) -> &str {
    base.trim_end_matches('/')
}
