use clap::{Parser, Subcommand};
use mw_gadgets::definition::render_definition;
use mw_gadgets::emit::EmitMode;
use mw_gadgets::output;
use mw_gadgets::payload::{RandomHash, Strategy};
use mw_gadgets::project::{BuildPlan, EntrypointOptions, Project};
use mw_gadgets::config;
use std::path::{Path, PathBuf};

fn version_string() -> &'static str {
    let on_tag = env!("ON_RELEASE_TAG");
    if on_tag == "true" {
        env!("CARGO_PKG_VERSION")
    } else {
        let hash = env!("GIT_HASH");
        if hash.is_empty() {
            "dev@unknown"
        } else {
            Box::leak(format!("dev@{hash}").into_boxed_str())
        }
    }
}

#[derive(Parser)]
#[command(name = "mw-gadgets")]
#[command(about = "Build orchestrator for MediaWiki gadgets")]
#[command(long_about = "\
Build orchestrator for MediaWiki gadgets

Gadgets are declared in a YAML manifest and developed as ordinary source
files. mw-gadgets decides which gadgets to build and in which order, and
writes a single entrypoint script that registers them with ResourceLoader
under the same conditions the Gadgets extension would apply.

Project structure:

  mw-gadgets.toml                    # Project config (optional)
  src/
  ├── gadgets/
  │   ├── gadgets-definition.yaml    # Manifest: workspace rules + gadgets by section
  │   └── core/
  │       └── QuickPurge/
  │           ├── QuickPurge.ts
  │           └── i18n.json          # Copied to dist/ by rollup
  └── mediawiki/
      ├── Common.ts                  # Interface code, loaded everywhere
      └── Vector.less                # Loaded on the vector skin only

Typical use:

  mw-gadgets inputs > inputs.json    # Entries for the JS/CSS bundler
  mw-gadgets entrypoint --self-contained --lazy
                                     # Dev: load.js fetches from the dev server
  mw-gadgets rollup --minify         # Per-gadget gadget-impl.js + load.js

Run 'mw-gadgets gen-config' to generate a documented mw-gadgets.toml.")]
#[command(version = version_string())]
struct Cli {
    /// Project root (holds mw-gadgets.toml)
    #[arg(long, default_value = ".", global = true)]
    root: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Validate the manifest and show the build order
    Check,
    /// Write the entrypoint script
    Entrypoint {
        /// Embed every gadget instead of loading rolled-up bundles
        #[arg(long)]
        self_contained: bool,
        /// Fetch gadget files at runtime instead of embedding compiled code
        #[arg(long, requires = "self_contained")]
        lazy: bool,
        /// Minify generated code
        #[arg(long)]
        minify: bool,
        /// Load from the preview server instead of the dev server
        #[arg(long)]
        preview: bool,
    },
    /// Roll each gadget up into gadget-impl.js and write a loader entrypoint
    Rollup {
        /// Minify generated code
        #[arg(long)]
        minify: bool,
    },
    /// Print bundler entries and assets as JSON
    Inputs,
    /// Print MediaWiki:Gadgets-definition wikitext for the selected gadgets
    Definition,
    /// Print a stock mw-gadgets.toml with all options documented
    GenConfig,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    match cli.command {
        Command::GenConfig => {
            print!("{}", config::stock_config_toml());
            Ok(())
        }
        command => run(&cli.root, command),
    }
}

fn run(root: &Path, command: Command) -> Result<(), Box<dyn std::error::Error>> {
    let project = Project::load(root)?;
    let plan = project.plan()?;

    match command {
        Command::Check => {
            println!("==> Checking {}", project.config().manifest_path(root).display());
            report_plan(&plan);
            output::print_schedule(&plan.schedule, &plan.interface);
        }
        Command::Entrypoint {
            self_contained,
            lazy,
            minify,
            preview,
        } => {
            report_plan(&plan);
            let options = EntrypointOptions {
                mode: if self_contained {
                    EmitMode::SelfContained
                } else {
                    EmitMode::Reference
                },
                strategy: if lazy { Strategy::Lazy } else { Strategy::Inline },
                minify,
                preview,
            };
            let transform = project.transform();
            let target = project.entrypoint_path();
            println!("==> Writing {}", target.display());
            let report = project.write_entrypoint(
                &plan,
                options,
                transform.as_ref(),
                Box::new(RandomHash),
                output::print_emit_event,
            )?;
            output::print_emit_summary(&report, &target);
        }
        Command::Rollup { minify } => {
            report_plan(&plan);
            let transform = project.transform();
            println!("==> Rolling up into {}", project.dist_dir().display());
            let report = project.rollup(
                &plan,
                minify,
                transform.as_ref(),
                Box::new(RandomHash),
                output::print_emit_event,
            )?;
            output::print_emit_summary(&report.bundles, &project.dist_dir());
            output::print_emit_summary(&report.entrypoint, &project.entrypoint_path());
            println!("Copied {} i18n files", report.assets_copied);
        }
        Command::Inputs => {
            report_plan(&plan);
            let inputs = project.bundle_inputs(&plan);
            println!("{}", serde_json::to_string_pretty(&inputs)?);
        }
        Command::Definition => {
            report_plan(&plan);
            print!(
                "{}",
                render_definition(plan.schedule.units(), &project.config().namespace)
            );
        }
        Command::GenConfig => print!("{}", config::stock_config_toml()),
    }

    Ok(())
}

/// Report everything left out of the plan on stderr.
fn report_plan(plan: &BuildPlan) {
    output::print_exclusions(&plan.excluded);
    if let Some(err) = &plan.interface_error {
        eprintln!("Skipping interface code: {err}");
    }
    output::print_unresolved(&plan.unresolved);
}
