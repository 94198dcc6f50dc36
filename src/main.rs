use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use crossfade::catalog::{Song, UNKNOWN_KEY};
use crossfade::setlist::SetList;
use crossfade::store::{self, Store};
use crossfade::watch::WatchList;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "crossfade", version, about = "DJ song catalog — songs, transitions, set lists")]
struct Cli {
    /// Directory holding the catalog JSON files
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    /// Verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Add a song to the catalog
    Add {
        /// Song name
        name: String,

        /// Tempo in BPM (0 = unset)
        #[arg(short, long, default_value = "0")]
        tempo: u32,

        /// Musical key (e.g. "A Minor", "C# Major")
        #[arg(short, long, default_value = UNKNOWN_KEY)]
        key: String,
    },

    /// List all songs
    List,

    /// Remove songs by name (case-insensitive), cascading to transitions
    Remove {
        /// Names of songs to remove
        #[arg(required = true)]
        names: Vec<String>,
    },

    /// Link a transition from one song to another (by name)
    Link {
        /// Song to mix out of
        from: String,

        /// Song to mix into
        to: String,
    },

    /// Show the transitions out of a song
    Transitions {
        /// Song name
        song: String,
    },

    /// Search songs by name substring
    Search {
        /// Search term (case-insensitive)
        term: String,
    },

    /// Import songs from a folder of audio files
    Import {
        /// Folder to import from
        path: PathBuf,
    },

    /// Manage the watched-folder list
    Watch {
        #[command(subcommand)]
        command: WatchCommands,
    },

    /// Re-scan every watched folder for new songs
    Scan,

    /// Manage the working set list
    Setlist {
        #[command(subcommand)]
        command: SetlistCommands,
    },

    /// Show catalog statistics
    Stats,
}

#[derive(Subcommand)]
enum WatchCommands {
    /// Start watching a folder
    Add {
        /// Folder to watch
        path: PathBuf,
    },

    /// Stop watching folders
    Remove {
        /// Folders to stop watching
        #[arg(required = true)]
        paths: Vec<PathBuf>,
    },

    /// List watched folders
    List,
}

#[derive(Subcommand)]
enum SetlistCommands {
    /// Append a song to the set list (by name)
    Add {
        /// Song name
        song: String,
    },

    /// Remove a song from the set list (by name)
    Remove {
        /// Song name
        song: String,
    },

    /// Empty the set list
    Clear,

    /// Print the set list in order
    Show,

    /// Export the set list to a text file, one song name per line
    Save {
        /// Target text file
        path: PathBuf,
    },

    /// Replace the set list with names read from a text file
    Load {
        /// Source text file
        path: PathBuf,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Set up logging based on verbosity
    let log_level = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level))
        .format_timestamp(None)
        .init();

    // Load config file (optional, defaults if missing)
    let config = crossfade::config::AppConfig::load();

    // Resolve data directory: CLI > config > XDG default
    let data_dir = cli
        .data_dir
        .or(config.data_dir.clone())
        .unwrap_or_else(crossfade::config::default_data_dir);
    log::info!("Data directory: {}", data_dir.display());

    let store = Store::open(&data_dir).context("Failed to open data directory")?;
    let mut catalog = store.load_catalog();
    let mut watch = WatchList::from_folders(store.load_watched());
    let mut setlist = SetList::from_ids(store.load_setlist());

    match cli.command {
        Commands::Add { name, tempo, key } => match catalog.add_song(&name, tempo, &key) {
            Ok(song) => {
                let name = song.name.clone();
                store.save_catalog(&catalog).context("Failed to save catalog")?;
                println!("Added \"{name}\".");
            }
            Err(e) => println!("{e}"),
        },

        Commands::List => {
            if catalog.songs().is_empty() {
                println!("No songs in the catalog.");
            } else {
                print_song_table(catalog.songs());
            }
        }

        Commands::Remove { names } => {
            let mut ids = Vec::new();
            for name in &names {
                match catalog.find_song_by_name(name) {
                    Some(song) => ids.push(song.id.clone()),
                    None => println!("No song named \"{name}\"."),
                }
            }

            let removed = catalog.remove_songs(&ids);
            if removed > 0 {
                setlist.retain_known(&catalog);
                store.save_catalog(&catalog).context("Failed to save catalog")?;
                store
                    .save_setlist(setlist.ids())
                    .context("Failed to save set list")?;
            }
            println!("{removed} song(s) removed.");
        }

        Commands::Link { from, to } => {
            let from_song = catalog.find_song_by_name(&from).map(|s| (s.id.clone(), s.name.clone()));
            let to_song = catalog.find_song_by_name(&to).map(|s| (s.id.clone(), s.name.clone()));

            match (from_song, to_song) {
                (Some((from_id, from_name)), Some((to_id, to_name))) => {
                    match catalog.link(&from_id, &to_id) {
                        Ok(()) => {
                            store.save_catalog(&catalog).context("Failed to save catalog")?;
                            println!("Linked \"{from_name}\" -> \"{to_name}\".");
                        }
                        Err(e) => println!("{e}"),
                    }
                }
                (None, _) => println!("No song named \"{from}\"."),
                (_, None) => println!("No song named \"{to}\"."),
            }
        }

        Commands::Transitions { song } => match catalog.find_song_by_name(&song) {
            Some(found) => {
                let targets = catalog.transitions_from(&found.id);
                println!("Transitions from \"{}\":", found.name);
                if targets.is_empty() {
                    println!("  (none linked yet)");
                } else {
                    for target in targets {
                        println!("  -> {}", target.name);
                    }
                }
            }
            None => println!("No song named \"{song}\"."),
        },

        Commands::Search { term } => {
            let hits = catalog.search(&term);
            if hits.is_empty() {
                println!("No songs matching \"{term}\".");
            } else {
                print_song_table(&hits.into_iter().cloned().collect::<Vec<_>>());
            }
        }

        Commands::Import { path } => match crossfade::scanner::import_folder(&mut catalog, &path) {
            Ok(outcome) => {
                store.save_catalog(&catalog).context("Failed to save catalog")?;
                println!(
                    "Imported {} new song(s) ({} already present).",
                    outcome.added, outcome.skipped
                );
            }
            Err(e) => println!("{e}"),
        },

        Commands::Watch { command } => match command {
            WatchCommands::Add { path } => match watch.add(&path) {
                Ok(added) => {
                    let display = added.display().to_string();
                    store
                        .save_watched(watch.folders())
                        .context("Failed to save watched folders")?;
                    println!("Watching {display}.");
                }
                Err(e) => println!("{e}"),
            },

            WatchCommands::Remove { paths } => {
                let removed = watch.remove(&paths);
                if removed > 0 {
                    store
                        .save_watched(watch.folders())
                        .context("Failed to save watched folders")?;
                }
                println!("{removed} folder(s) removed.");
            }

            WatchCommands::List => {
                if watch.is_empty() {
                    println!("No watched folders.");
                } else {
                    for folder in watch.folders() {
                        println!("{}", folder.display());
                    }
                }
            }
        },

        Commands::Scan => {
            if watch.is_empty() {
                println!("No watched folders.");
                return Ok(());
            }

            let summary = watch.scan_all(&mut catalog);
            if summary.added > 0 {
                store.save_catalog(&catalog).context("Failed to save catalog")?;
            }

            println!(
                "Scan complete: {} new song(s) from {} folder(s).",
                summary.added,
                watch.len() - summary.errors.len()
            );
            for (folder, error) in &summary.errors {
                println!("Failed to scan {}: {error}", folder.display());
            }
        }

        Commands::Setlist { command } => match command {
            SetlistCommands::Add { song } => match catalog.find_song_by_name(&song) {
                Some(found) => {
                    let (id, name) = (found.id.clone(), found.name.clone());
                    if setlist.add(&catalog, &id) {
                        store
                            .save_setlist(setlist.ids())
                            .context("Failed to save set list")?;
                        println!("Added \"{name}\" to the set list.");
                    } else {
                        println!("\"{name}\" is already in the set list.");
                    }
                }
                None => println!("No song named \"{song}\"."),
            },

            SetlistCommands::Remove { song } => match catalog.find_song_by_name(&song) {
                Some(found) => {
                    let (id, name) = (found.id.clone(), found.name.clone());
                    if setlist.remove(&id) {
                        store
                            .save_setlist(setlist.ids())
                            .context("Failed to save set list")?;
                        println!("Removed \"{name}\" from the set list.");
                    } else {
                        println!("\"{name}\" is not in the set list.");
                    }
                }
                None => println!("No song named \"{song}\"."),
            },

            SetlistCommands::Clear => {
                setlist.clear();
                store
                    .save_setlist(setlist.ids())
                    .context("Failed to save set list")?;
                println!("Set list cleared.");
            }

            SetlistCommands::Show => {
                if setlist.is_empty() {
                    println!("Set list is empty.");
                } else {
                    for (i, song) in setlist.songs(&catalog).iter().enumerate() {
                        println!("{}. {}", i + 1, song.name);
                    }
                }
            }

            SetlistCommands::Save { path } => {
                let names = setlist.names(&catalog);
                let written = store::write_setlist_text(&path, &names)
                    .context("Failed to write set list")?;
                println!("Set list saved to {} ({written} song(s)).", path.display());
            }

            SetlistCommands::Load { path } => {
                let names =
                    store::read_setlist_text(&path).context("Failed to read set list")?;
                let matched = setlist.load_from_names(&catalog, &names);
                store
                    .save_setlist(setlist.ids())
                    .context("Failed to save set list")?;
                println!(
                    "Set list loaded: {matched} of {} name(s) matched the catalog.",
                    names.len()
                );
            }
        },

        Commands::Stats => {
            let stats = catalog.stats();
            println!("Catalog Statistics");
            println!("==================");
            println!("Songs:            {}", stats.songs);
            println!("Linked songs:     {}", stats.linked_sources);
            println!("Transitions:      {}", stats.transitions);
            println!("Set list length:  {}", setlist.len());
            println!("Watched folders:  {}", watch.len());
        }
    }

    Ok(())
}

/// Print a table of songs: name, tempo, key. Unset tempo shows as "-".
fn print_song_table(songs: &[Song]) {
    println!("{:<40} {:>5}  {}", "Song", "BPM", "Key");
    println!("{}", "-".repeat(60));

    for song in songs {
        let tempo = if song.tempo == 0 {
            "-".to_string()
        } else {
            song.tempo.to_string()
        };
        println!("{:<40} {:>5}  {}", song.name, tempo, song.key);
    }
}
