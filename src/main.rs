use std::path::PathBuf;
use std::time::{Duration, Instant};

use anyhow::Result;
use clap::{Args, Parser, Subcommand};

use gen1_scraper::config::{self, Config};
use gen1_scraper::fetch::Fetcher;
use gen1_scraper::{pipeline, store, verify};

#[derive(Parser)]
#[command(name = "gen1_scraper", about = "Generation 1 Pokémon data scraper for pokemondb.net")]
struct Cli {
    #[command(flatten)]
    opts: Opts,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
struct Opts {
    /// Directory for pokemon.json, moves.json, learnsets.csv and images/
    #[arg(long, global = true, env = "GEN1_OUT_DIR", default_value = config::DEFAULT_OUT_DIR)]
    out_dir: PathBuf,
    /// Site root for listings and move pages
    #[arg(long, global = true, env = "GEN1_BASE_URL", default_value = config::DEFAULT_BASE_URL)]
    base_url: String,
    /// Host serving sprite images
    #[arg(long, global = true, env = "GEN1_SPRITE_BASE_URL", default_value = config::DEFAULT_SPRITE_BASE_URL)]
    sprite_base_url: String,
    /// Pause after each request, in milliseconds (0 = none)
    #[arg(long, global = true, env = "GEN1_DELAY_MS", default_value = "0")]
    delay_ms: u64,
}

impl From<Opts> for Config {
    fn from(o: Opts) -> Self {
        Config {
            out_dir: o.out_dir,
            base_url: o.base_url,
            sprite_base_url: o.sprite_base_url,
            delay: Duration::from_millis(o.delay_ms),
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Moves, pokedex, learnsets and sprites in one pass
    Run {
        /// Don't download sprite images
        #[arg(long)]
        skip_sprites: bool,
    },
    /// Scrape the generation 1 move listing into moves.json
    Moves,
    /// Scrape the pokedex listing into pokemon.json
    Pokedex,
    /// Scrape learnsets using moves.json and pokemon.json already on disk
    Learnsets,
    /// Download sprites for the Pokemon in pokemon.json
    Sprites,
    /// Check the datasets in the output directory
    Verify,
}

#[tokio::main]
async fn main() -> Result<()> {
    gen1_scraper::init_tracing();

    let t0 = Instant::now();
    let cli = Cli::parse();
    let cfg = Config::from(cli.opts);

    let result = match cli.command {
        Commands::Run { skip_sprites } => {
            let fetcher = Fetcher::new(cfg.delay)?;
            store::ensure_dir(&cfg.out_dir)?;
            println!("Scraping Gen 1 Moves...");
            let moves = pipeline::run_moves(&fetcher, &cfg).await?;
            println!("Scraping Gen 1 Pokemon...");
            let pokemon = pipeline::run_pokedex(&fetcher, &cfg).await?;
            println!("Scraping Gen 1 Learnsets...");
            pipeline::run_learnsets(&fetcher, &cfg, &pokemon, &moves).await?;
            if !skip_sprites {
                println!("Scraping Gen 1 Images (FireRed/LeafGreen)...");
                pipeline::run_sprites(&fetcher, &cfg, &pokemon).await?;
            }
            Ok(())
        }
        Commands::Moves => {
            let fetcher = Fetcher::new(cfg.delay)?;
            pipeline::run_moves(&fetcher, &cfg).await?;
            Ok(())
        }
        Commands::Pokedex => {
            let fetcher = Fetcher::new(cfg.delay)?;
            pipeline::run_pokedex(&fetcher, &cfg).await?;
            Ok(())
        }
        Commands::Learnsets => {
            let moves = store::read_moves(&cfg.moves_path())?;
            let pokemon = store::read_pokemon(&cfg.pokemon_path())?;
            if moves.is_empty() || pokemon.is_empty() {
                println!("No moves or Pokemon on disk. Run 'moves' and 'pokedex' first.");
                return Ok(());
            }
            let fetcher = Fetcher::new(cfg.delay)?;
            pipeline::run_learnsets(&fetcher, &cfg, &pokemon, &moves).await?;
            Ok(())
        }
        Commands::Sprites => {
            let pokemon = store::read_pokemon(&cfg.pokemon_path())?;
            let fetcher = Fetcher::new(cfg.delay)?;
            pipeline::run_sprites(&fetcher, &cfg, &pokemon).await?;
            Ok(())
        }
        Commands::Verify => {
            println!("Loading data...");
            let data = verify::Dataset::load(&cfg.out_dir)?;
            let report = verify::verify(&data);
            report.print();
            if !report.passed() {
                std::process::exit(1);
            }
            Ok(())
        }
    };

    let elapsed = t0.elapsed();
    if elapsed.as_secs() >= 1 {
        println!("\nDone in {}", format_duration(elapsed));
    }

    result
}

fn format_duration(d: Duration) -> String {
    let secs = d.as_secs();
    if secs < 60 {
        format!("{:.1}s", d.as_secs_f64())
    } else if secs < 3600 {
        format!("{}m {}s", secs / 60, secs % 60)
    } else {
        format!("{}h {}m {}s", secs / 3600, (secs % 3600) / 60, secs % 60)
    }
}
