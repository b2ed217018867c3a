use std::fs;

use anyhow::{Context, Result};
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{debug, info, warn};

use crate::config::Config;
use crate::fetch::Fetcher;
use crate::model::{Learnset, Move, MoveIndex, Pokemon, MAX_SPECIES};
use crate::parser;
use crate::store;

/// Learnset pass stats returned after completion.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct LearnsetStats {
    pub total: usize,
    pub ok: usize,
    pub failed: usize,
    /// Move names on fetched pages that didn't resolve to a scraped move.
    pub unresolved: usize,
    pub malformed_rows: usize,
}

/// Sprite pass stats returned after completion.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct SpriteStats {
    pub total: usize,
    pub ok: usize,
    pub failed: usize,
}

fn progress_bar(len: usize) -> Result<ProgressBar> {
    let pb = ProgressBar::new(len as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("[{elapsed_precise}] {bar:40} {pos}/{len} {msg}")?
            .progress_chars("=> "),
    );
    Ok(pb)
}

// ── Bulk listings ──

/// Fetch and parse the move listing. Any failure aborts.
pub async fn scrape_moves(fetcher: &Fetcher, cfg: &Config) -> Result<Vec<Move>> {
    let url = cfg.moves_url();
    info!("Fetching moves listing: {}", url);
    let html = fetcher
        .text(&url)
        .await
        .context("Failed to fetch moves listing")?;
    let moves = parser::moves::extract(&html)?;
    info!("Parsed {} moves", moves.len());
    Ok(moves)
}

/// Fetch and parse the pokédex listing. Any failure aborts.
pub async fn scrape_pokedex(fetcher: &Fetcher, cfg: &Config) -> Result<Vec<Pokemon>> {
    let url = cfg.pokedex_url();
    info!("Fetching pokedex listing: {}", url);
    let html = fetcher
        .text(&url)
        .await
        .context("Failed to fetch pokedex listing")?;
    let pokemon = parser::pokedex::extract(&html)?;
    if pokemon.len() != MAX_SPECIES as usize {
        warn!(
            "Pokedex listing yielded {} species, expected {}",
            pokemon.len(),
            MAX_SPECIES
        );
    }
    info!("Parsed {} Pokemon", pokemon.len());
    Ok(pokemon)
}

// ── Per-species pages ──

/// Fetch each species' move page in order and resolve it against the move index.
///
/// A page that fails to fetch is logged and left out; the verifier's learnset
/// count then flags the gap.
pub async fn scrape_learnsets(
    fetcher: &Fetcher,
    cfg: &Config,
    pokemon: &[Pokemon],
    index: &MoveIndex,
) -> Result<(Vec<Learnset>, LearnsetStats)> {
    let pb = progress_bar(pokemon.len())?;
    let mut stats = LearnsetStats {
        total: pokemon.len(),
        ..Default::default()
    };
    let mut learnsets = Vec::with_capacity(pokemon.len());

    for p in pokemon {
        pb.set_message(p.name.clone());
        let url = cfg.learnset_url(&p.identifier);
        match fetcher.text(&url).await {
            Ok(html) => {
                let page = parser::learnset::extract(&html, index);
                if !page.unresolved.is_empty() {
                    debug!("{}: dropped unresolved moves {:?}", p.name, page.unresolved);
                }
                stats.ok += 1;
                stats.unresolved += page.unresolved.len();
                stats.malformed_rows += page.malformed_rows;
                debug!("Scraped {} moves for {}", page.move_ids.len(), p.name);
                learnsets.push(Learnset {
                    pokemon_id: p.id,
                    move_ids: page.move_ids,
                });
            }
            Err(e) => {
                stats.failed += 1;
                pb.suspend(|| warn!("Failed to fetch moves for {} ({}): {:#}", p.name, url, e));
            }
        }
        pb.inc(1);
    }

    pb.finish_and_clear();
    info!(
        "Learnsets: {} pages ({} ok, {} failed), {} unresolved move names, {} malformed rows",
        stats.total, stats.ok, stats.failed, stats.unresolved, stats.malformed_rows
    );
    Ok((learnsets, stats))
}

/// Download one sprite per species into `images/<id>.png`.
pub async fn scrape_sprites(
    fetcher: &Fetcher,
    cfg: &Config,
    pokemon: &[Pokemon],
) -> Result<SpriteStats> {
    store::ensure_dir(&cfg.images_dir())?;
    let pb = progress_bar(pokemon.len())?;
    let mut stats = SpriteStats {
        total: pokemon.len(),
        ..Default::default()
    };

    for p in pokemon {
        pb.set_message(p.name.clone());
        let url = cfg.sprite_url(&p.identifier);
        let path = cfg.sprite_path(p.id);
        let result = match fetcher.bytes(&url).await {
            Ok(bytes) => fs::write(&path, bytes)
                .with_context(|| format!("Failed to write {}", path.display())),
            Err(e) => Err(e),
        };
        match result {
            Ok(()) => stats.ok += 1,
            Err(e) => {
                stats.failed += 1;
                pb.suspend(|| warn!("Failed to download image for {}: {:#}", p.name, e));
            }
        }
        pb.inc(1);
    }

    pb.finish_and_clear();
    info!(
        "Sprites: {} ({} ok, {} failed)",
        stats.total, stats.ok, stats.failed
    );
    Ok(stats)
}

// ── Phases with output ──

pub async fn run_moves(fetcher: &Fetcher, cfg: &Config) -> Result<Vec<Move>> {
    let moves = scrape_moves(fetcher, cfg).await?;
    store::write_moves(&cfg.moves_path(), &moves)?;
    println!("Scraped {} Moves.", moves.len());
    Ok(moves)
}

pub async fn run_pokedex(fetcher: &Fetcher, cfg: &Config) -> Result<Vec<Pokemon>> {
    let pokemon = scrape_pokedex(fetcher, cfg).await?;
    store::write_pokemon(&cfg.pokemon_path(), &pokemon)?;
    println!("Scraped {} Pokemon.", pokemon.len());
    Ok(pokemon)
}

pub async fn run_learnsets(
    fetcher: &Fetcher,
    cfg: &Config,
    pokemon: &[Pokemon],
    moves: &[Move],
) -> Result<LearnsetStats> {
    let index = MoveIndex::from_moves(moves);
    let (learnsets, stats) = scrape_learnsets(fetcher, cfg, pokemon, &index).await?;
    store::write_learnsets(&cfg.learnsets_path(), &learnsets)?;
    println!(
        "Learnsets scraped: {} ok, {} failed, {} unresolved move names dropped.",
        stats.ok, stats.failed, stats.unresolved
    );
    Ok(stats)
}

pub async fn run_sprites(fetcher: &Fetcher, cfg: &Config, pokemon: &[Pokemon]) -> Result<SpriteStats> {
    let stats = scrape_sprites(fetcher, cfg, pokemon).await?;
    println!("Sprites downloaded: {} ok, {} failed.", stats.ok, stats.failed);
    Ok(stats)
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::sync::Arc;
    use std::time::Duration;

    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    use super::*;

    fn fixture(name: &str) -> Vec<u8> {
        fs::read(format!("tests/fixtures/{}", name)).unwrap()
    }

    /// Minimal HTTP/1.1 responder: known paths get 200 + body, everything else 404.
    async fn serve(routes: HashMap<String, Vec<u8>>) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let routes = Arc::new(routes);

        tokio::spawn(async move {
            while let Ok((mut sock, _)) = listener.accept().await {
                let routes = Arc::clone(&routes);
                tokio::spawn(async move {
                    let mut buf = Vec::new();
                    let mut chunk = [0u8; 1024];
                    loop {
                        let n = sock.read(&mut chunk).await.unwrap_or(0);
                        if n == 0 {
                            break;
                        }
                        buf.extend_from_slice(&chunk[..n]);
                        if buf.windows(4).any(|w| w == b"\r\n\r\n") {
                            break;
                        }
                    }
                    let request = String::from_utf8_lossy(&buf);
                    let path = request.split_whitespace().nth(1).unwrap_or("/").to_string();
                    let (status, body) = match routes.get(&path) {
                        Some(body) => ("200 OK", body.clone()),
                        None => ("404 Not Found", b"not found".to_vec()),
                    };
                    let head = format!(
                        "HTTP/1.1 {}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n",
                        status,
                        body.len()
                    );
                    let _ = sock.write_all(head.as_bytes()).await;
                    let _ = sock.write_all(&body).await;
                    let _ = sock.shutdown().await;
                });
            }
        });

        format!("http://{}", addr)
    }

    fn fetcher() -> Fetcher {
        let client = reqwest::Client::builder().no_proxy().build().unwrap();
        Fetcher::with_client(client, Duration::ZERO)
    }

    #[tokio::test]
    async fn end_to_end_against_fixtures() {
        let routes = HashMap::from([
            ("/move/generation/1".to_string(), fixture("moves_gen1.html")),
            ("/pokedex/all".to_string(), fixture("pokedex_all.html")),
            ("/pokedex/charizard/moves/1".to_string(), fixture("charizard_moves_1.html")),
            (
                "/sprites/firered-leafgreen/normal/pikachu.png".to_string(),
                b"\x89PNG fake".to_vec(),
            ),
        ]);
        let base = serve(routes).await;
        let dir = tempfile::tempdir().unwrap();
        let cfg = Config {
            out_dir: dir.path().to_path_buf(),
            base_url: base.clone(),
            sprite_base_url: base,
            delay: Duration::ZERO,
        };
        let fetcher = fetcher();

        let moves = run_moves(&fetcher, &cfg).await.unwrap();
        assert_eq!(moves.len(), 12);
        let pokemon = run_pokedex(&fetcher, &cfg).await.unwrap();
        assert_eq!(pokemon.len(), 10);

        let stats = run_learnsets(&fetcher, &cfg, &pokemon, &moves).await.unwrap();
        assert_eq!(
            stats,
            LearnsetStats {
                total: 10,
                ok: 1,
                failed: 9,
                unresolved: 6,
                malformed_rows: 1,
            }
        );
        // Ember (4), Flamethrower (5), Growl (6)
        let csv = fs::read_to_string(cfg.learnsets_path()).unwrap();
        assert_eq!(csv, "6,4,5,6\n");

        let sprites = run_sprites(&fetcher, &cfg, &pokemon).await.unwrap();
        assert_eq!(sprites.ok, 1);
        assert_eq!(sprites.failed, 9);
        assert_eq!(fs::read(cfg.sprite_path(25)).unwrap(), b"\x89PNG fake");
        assert!(!cfg.sprite_path(6).exists());

        assert_eq!(store::read_moves(&cfg.moves_path()).unwrap(), moves);
        assert_eq!(store::read_pokemon(&cfg.pokemon_path()).unwrap(), pokemon);
    }

    #[tokio::test]
    async fn bulk_listing_failure_aborts() {
        let base = serve(HashMap::new()).await;
        let cfg = Config {
            base_url: base,
            ..Config::default()
        };
        assert!(scrape_moves(&fetcher(), &cfg).await.is_err());
        assert!(scrape_pokedex(&fetcher(), &cfg).await.is_err());
    }
}
