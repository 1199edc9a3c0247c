use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use pwnstyles::sass::SassOptions;
use pwnstyles::{
  ExclusionSet, ExpansionRegistry, Generator, GeneratorKind, ProjectLayout, sass_plugin_for,
};

#[derive(Parser)]
#[command(name = "pwnstyles")]
#[command(version)]
#[command(about = "Install and compile the pwnstyles stylesheet bundle", long_about = None)]
struct Cli {
  /// Root of the application receiving the bundle.
  #[arg(long, global = true, default_value = ".")]
  project_root: PathBuf,

  /// Bundle tree to copy from, overriding the configured one.
  #[arg(long, global = true)]
  bundle_root: Option<PathBuf>,

  #[command(subcommand)]
  command: Commands,
}

#[derive(Subcommand)]
enum Commands {
  /// Copy stylesheets, javascripts and layouts, overwriting local changes.
  Install {
    /// Additional relative paths to leave untouched.
    #[arg(long = "exclude")]
    exclude: Vec<String>,
  },
  /// Refresh stylesheets and javascripts, keeping customised files.
  Update {
    /// Additional relative paths to leave untouched.
    #[arg(long = "exclude")]
    exclude: Vec<String>,
  },
  /// Copy layouts and static assets.
  All {
    /// Additional relative paths to leave untouched.
    #[arg(long = "exclude")]
    exclude: Vec<String>,
  },
  /// Compile the registered SCSS template locations.
  Compile {
    /// Environment selecting the output style (overrides PWNSTYLES_ENV).
    #[arg(long)]
    env: Option<String>,
  },
  /// Print the link tags for a stylesheet expansion.
  LinkTags {
    /// Expansion name.
    #[arg(default_value = pwnstyles::expansions::DEFAULT_EXPANSION)]
    name: String,
  },
}

fn main() -> Result<()> {
  tracing_subscriber::registry()
    .with(
      tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "pwnstyles=info".into()),
    )
    .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
    .init();

  let cli = Cli::parse();
  let mut layout = ProjectLayout::discover(&cli.project_root).with_context(|| {
    format!(
      "failed to load configuration from {}",
      cli.project_root.display()
    )
  })?;
  if let Some(bundle_root) = cli.bundle_root {
    layout = layout.with_bundle_root(bundle_root);
  }

  match cli.command {
    Commands::Install { exclude } => run_generator(GeneratorKind::Install, &layout, &exclude),
    Commands::Update { exclude } => run_generator(GeneratorKind::Update, &layout, &exclude),
    Commands::All { exclude } => run_generator(GeneratorKind::All, &layout, &exclude),
    Commands::Compile { env } => {
      let mut plugin = sass_plugin_for(&layout);
      if let Some(env) = env {
        plugin.set_options(SassOptions::for_environment(&env));
      }
      let written = plugin.compile_all()?;
      for path in written {
        println!("{}", path.display());
      }
      Ok(())
    }
    Commands::LinkTags { name } => {
      println!("{}", ExpansionRegistry::with_defaults().render_link_tags(&name)?);
      Ok(())
    }
  }
}

fn run_generator(kind: GeneratorKind, layout: &ProjectLayout, exclude: &[String]) -> Result<()> {
  let extra: ExclusionSet = exclude.iter().collect();
  let generator = Generator::plan(kind, layout.config(), &extra);
  info!(
    generator = %kind,
    bundle = %layout.bundle_root().display(),
    project = %layout.root().display(),
    "running generator"
  );

  for report in generator.run(layout)? {
    println!("{report}");
  }
  Ok(())
}
