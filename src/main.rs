use clap::{Parser, Subcommand};
use portfolio_gal::fetch::{Fetch, HttpFetcher, LocalFetcher};
use portfolio_gal::loader::{self, ProjectLoader};
use portfolio_gal::{config, output, scan, sidecars};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "portfolio-gal")]
#[command(about = "Manifest generator and project loader for portfolio sites")]
#[command(long_about = "\
Manifest generator and project loader for portfolio sites

Every directory under the projects root is a project. Images are listed by
extension (jpg, jpeg, png, webp, avif) and ordered: cover.<ext> first, then
by the first number in the file name, then by name.

Project structure:

  assets/projects/
  ├── manifest.json            # Written by `generate`
  ├── CASA-XD/
  │   ├── metadata.json        # {\"title\", \"area\", \"blurb\", \"text\"}, all optional
  │   ├── index.json           # Image names for sites without a manifest
  │   ├── cover.jpg            # Lead image
  │   ├── 01.jpg
  │   └── 02.jpg
  └── RU-SM/
      └── 01.jpg               # No cover: first image leads

Loading tries, in order: the API endpoint, manifest.json, then the configured
fallback folders with guessed image names.

Run 'portfolio-gal gen-config' to generate a documented config.toml.")]
#[command(version)]
struct Cli {
    /// Directory holding config.toml
    #[arg(long, default_value = ".", global = true)]
    config_dir: PathBuf,

    /// Log debug detail to stderr (RUST_LOG overrides)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Scan project folders into manifest.json
    Generate {
        /// Projects root to scan [default: generator.source]
        source: Option<PathBuf>,
        /// URL prefix for image paths [default: generator.prefix]
        prefix: Option<String>,
        /// Also write index.json and metadata.json into each project folder
        #[arg(long)]
        sidecars: bool,
        /// Overwrite existing metadata.json files (with --sidecars)
        #[arg(long, requires = "sidecars")]
        force: bool,
    },
    /// Run the loader cascade and list the projects it finds
    Load {
        /// Site to load from: an http(s) URL or a web root directory
        #[arg(long, default_value = ".")]
        site: String,
        /// Fetch one project's metadata.json and show its detail view
        #[arg(long)]
        refresh: Option<String>,
    },
    /// Write manifest.json for a homepage hero image folder
    Hero {
        /// Folder holding the hero images
        dir: PathBuf,
    },
    /// Print a stock config.toml with all options documented
    GenConfig,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Command::Generate {
            source,
            prefix,
            sidecars: with_sidecars,
            force,
        } => {
            let site_config = config::load_config(&cli.config_dir)?;
            let source = source.unwrap_or_else(|| PathBuf::from(&site_config.generator.source));
            let prefix = prefix.unwrap_or(site_config.generator.prefix);

            let manifest = scan::scan(&source, &prefix)?;
            let manifest_path = scan::write_manifest(&source, &manifest)?;
            output::print_generate_output(&manifest, &manifest_path);

            if with_sidecars {
                let reports = sidecars::write_sidecars(&source, force)?;
                output::print_sidecar_report(&reports);
            }
        }
        Command::Load { site, refresh } => {
            let site_config = config::load_config(&cli.config_dir)?;
            let fetcher = site_fetcher(&site, &site_config)?;
            load(fetcher, site_config.loader, refresh.as_deref());
        }
        Command::Hero { dir } => {
            let (path, hero) = sidecars::write_hero_manifest(&dir)?;
            output::print_hero_output(&hero, &path);
        }
        Command::GenConfig => {
            print!("{}", config::stock_config_toml());
        }
    }

    Ok(())
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

/// HTTP for `http://` and `https://` sites, the local filesystem otherwise.
fn site_fetcher(
    site: &str,
    site_config: &config::SiteConfig,
) -> Result<Box<dyn Fetch>, Box<dyn std::error::Error>> {
    let fetcher: Box<dyn Fetch> = if site.starts_with("http://") || site.starts_with("https://")
    {
        let base = if site.ends_with('/') {
            site.to_string()
        } else {
            format!("{site}/")
        };
        Box::new(HttpFetcher::new(&base, site_config.http.timeout())?)
    } else {
        Box::new(LocalFetcher::new(Path::new(site)))
    };
    Ok(fetcher)
}

fn load(fetcher: Box<dyn Fetch>, loader_config: config::LoaderConfig, refresh: Option<&str>) {
    let assets_root = loader_config.assets_root.clone();
    let guess_count = loader_config.guess_count;
    let mut project_loader = ProjectLoader::new(fetcher, loader_config);

    let projects = project_loader.ensure_loaded().to_vec();
    if let Some(tier) = project_loader.served_by() {
        output::print_projects(&projects, tier, &assets_root);
    }

    if let Some(folder) = refresh {
        if project_loader.refresh_metadata(folder).is_none() {
            eprintln!("No loaded project named {folder}");
            return;
        }
        if let Some(project) = project_loader.project(folder) {
            println!();
            let pictures = loader::all_pictures(project, &assets_root, guess_count);
            output::print_project_detail(project, &pictures);
        }
    }
}
