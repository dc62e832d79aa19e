use clap::{Parser, Subcommand};
use folio_site::app::{Navigation, PortfolioApp};
use folio_site::effects::clipboard::{CopyOutcome, Osc52Clipboard, SystemClipboard, copy_text};
use folio_site::effects::typing::{Typewriter, TypingTask};
use folio_site::source::DirSource;
use folio_site::template::{self, ProjectType};
use folio_site::types::ProjectRecord;
use folio_site::{config, effects, markup, output, site};
use serde::Serialize;
use std::io::{self, Write};
use std::path::PathBuf;
use tracing::debug;

#[derive(Parser)]
#[command(name = "folio")]
#[command(about = "Assemble and inspect a fragment-based portfolio site")]
#[command(long_about = "\
Assemble and inspect a fragment-based portfolio site

Pages are plain HTML shells. Shared fragments (header, footer, intro, ...)
are injected into elements whose id is `<name>-placeholder`. Pages under
projects/ reach shared files through ../, and the header's links are
rewritten to match.

Site structure:

  site/
  ├── folio.toml                   # Config and project catalog (optional)
  ├── index.html                   # Page shell with placeholders
  ├── components/                  # Shared fragments
  │   ├── header.html
  │   └── footer.html
  ├── projects/                    # Nested project pages
  │   └── bbc-converter.html
  └── assets/                      # Copied as-is

Run 'folio gen-config' to generate a documented folio.toml.")]
#[command(version)]
struct Cli {
    /// Site root directory
    #[arg(long, default_value = ".", global = true)]
    site: PathBuf,

    /// Config file (defaults to folio.toml in the site root)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Inject fragments into every page and write the result
    Assemble {
        /// Output directory
        #[arg(long, default_value = "dist")]
        output: PathBuf,
    },
    /// List the project catalog
    Projects {
        /// Only featured projects
        #[arg(long)]
        featured: bool,
        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
    },
    /// Show what opening a project does: its page URL or its detail markup
    Show { id: String },
    /// Print the all-projects gallery markup
    Gallery,
    /// Write standalone project pages
    ProjectPage {
        /// Project id
        #[arg(required_unless_present = "missing")]
        id: Option<String>,
        /// Write pages for every project that has none yet
        #[arg(long, conflicts_with = "id")]
        missing: bool,
        /// Output directory (defaults to the site's projects directory)
        #[arg(long)]
        output: Option<PathBuf>,
    },
    /// Print a [[projects]] entry for a new project
    QuickSetup {
        id: String,
        title: String,
        description: String,
        /// Technologies, comma separated (defaults to the type's preset)
        #[arg(long, value_delimiter = ',')]
        tech: Vec<String>,
        /// web-scraping, security-testing, data-analysis or automation
        #[arg(long, default_value = "web-scraping")]
        kind: ProjectType,
    },
    /// Copy a page's code block to the clipboard
    Copy {
        file: PathBuf,
        /// Zero-based code block index
        #[arg(long, default_value_t = 0)]
        index: usize,
    },
    /// Show what a page's effects and project cards do on first view
    Preview { file: PathBuf },
    /// Run the typed-text banner in the terminal
    Typing {
        /// Stop after this many phrases (runs until Enter otherwise)
        #[arg(long)]
        cycles: Option<usize>,
    },
    /// Print a stock folio.toml with all options documented
    GenConfig,
}

#[derive(Serialize)]
struct ProjectsEntry<'a> {
    projects: Vec<&'a ProjectRecord>,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();

    let (config, catalog) = match cli.command {
        Command::GenConfig => {
            print!("{}", config::stock_config_toml());
            return Ok(());
        }
        _ => site::load_site(&cli.site, cli.config.as_deref())?,
    };

    match cli.command {
        Command::Assemble { output: out_dir } => {
            println!("==> Assembling {} → {}", cli.site.display(), out_dir.display());
            let report = site::assemble_site(&cli.site, &out_dir, &config)?;
            output::print_site_output(&report);
        }
        Command::Projects { featured, json } => {
            let projects: Vec<&ProjectRecord> = if featured {
                catalog.featured_projects()
            } else {
                catalog.all_projects().iter().collect()
            };
            if json {
                println!("{}", serde_json::to_string_pretty(&projects)?);
            } else {
                output::print_projects(projects);
            }
        }
        Command::Show { id } => {
            let pages = DirSource::new(&cli.site);
            let mut app = PortfolioApp::new(&catalog, &config).with_pages(&pages);
            match app.navigate_to_project(&id) {
                Navigation::Page(url) => println!("Project page: {url}"),
                Navigation::Detail | Navigation::Gallery => println!("{}", app.modal().content()),
                Navigation::NotFound => return Err(format!("project not found: {id}").into()),
            }
        }
        Command::Gallery => {
            let mut app = PortfolioApp::new(&catalog, &config);
            app.show_all_projects();
            println!("{}", app.modal().content());
        }
        Command::ProjectPage {
            id,
            missing,
            output: out_dir,
        } => {
            if missing {
                let written = site::scaffold_project_pages(&cli.site, &config, &catalog)?;
                for id in &written {
                    println!("{}/{id}.html", config.site.nested_marker);
                }
                println!("Wrote {} project pages", written.len());
            } else if let Some(id) = id {
                let project = catalog
                    .get_project(&id)
                    .ok_or_else(|| format!("project not found: {id}"))?;
                let dir = out_dir.unwrap_or_else(|| cli.site.join(&config.site.nested_marker));
                let path = template::write_project_page(project, &dir)?;
                println!("{}", path.display());
            }
        }
        Command::QuickSetup {
            id,
            title,
            description,
            tech,
            kind,
        } => {
            let record = template::quick_setup(&id, &title, &description, Some(tech), kind)?;
            let entry = ProjectsEntry {
                projects: vec![&record],
            };
            print!("{}", toml::to_string(&entry)?);
        }
        Command::Copy { file, index } => {
            let html = std::fs::read_to_string(&file)?;
            let blocks = markup::code_blocks(&html);
            let text = blocks.get(index).ok_or_else(|| {
                format!(
                    "{} has {} code blocks, no block {index}",
                    file.display(),
                    blocks.len()
                )
            })?;
            let primary = SystemClipboard::default();
            let fallback = Osc52Clipboard::new(io::stdout());
            match copy_text(Some(&primary), &fallback, text)? {
                CopyOutcome::Copied => println!("Copied!"),
                CopyOutcome::CopiedWithFallback => println!("Copied! (via terminal)"),
            }
        }
        Command::Preview { file } => {
            let html = std::fs::read_to_string(&file)?;
            let pass = effects::first_view(&html, &config.effects);
            let pages = DirSource::new(&cli.site);
            let mut app = PortfolioApp::new(&catalog, &config).with_pages(&pages);
            let cards = app.click_cards(&html);
            output::print_preview(&pass, &cards);
        }
        Command::Typing { cycles } => {
            let typewriter =
                Typewriter::new(&config.effects.typing).ok_or("no typing phrases configured")?;
            match cycles {
                Some(n) => run_typing(typewriter, n)?,
                None => {
                    eprintln!("Press Enter to stop");
                    let task = TypingTask::spawn(typewriter, |text| {
                        print!("\r\x1b[K{text}");
                        if let Err(e) = io::stdout().flush() {
                            debug!(error = %e, "typing frame flush failed");
                        }
                    })?;
                    let mut line = String::new();
                    io::stdin().read_line(&mut line)?;
                    task.stop();
                    println!();
                }
            }
        }
        Command::GenConfig => {}
    }

    Ok(())
}

/// Run the typed-text loop in the foreground for `cycles` phrases.
fn run_typing(mut typewriter: Typewriter, cycles: usize) -> io::Result<()> {
    let mut stdout = io::stdout();
    std::thread::sleep(typewriter.start_delay());
    while typewriter.cycles() < cycles {
        let frame = typewriter.step();
        write!(stdout, "\r\x1b[K{}", frame.text)?;
        stdout.flush()?;
        std::thread::sleep(frame.next_delay);
    }
    writeln!(stdout)?;
    Ok(())
}
