mod list;
mod search;
mod show;

use std::fmt;
use std::sync::Arc;

use anyhow::Result;
use bpaf::Bpaf;
use indoc::indoc;
use tracing::debug;

use crate::config::Config;
use crate::utils::init::init_catalog_client;

static POKEDEX_DESCRIPTION: &'_ str = indoc! {"
    Browse the catalog of the original 151 Pokémon species.\n\n

    Pages are fetched from the PokéAPI on demand,
    searches run against a local copy of the whole catalog."
};

fn vec_len<T>(x: Vec<T>) -> usize {
    Vec::len(&x)
}

#[derive(Bpaf, Clone, Copy, Debug)]
pub enum Verbosity {
    Verbose(
        /// Increase logging verbosity
        ///
        /// Invoke multiple times for increasing detail.
        #[bpaf(short('v'), long("verbose"), req_flag(()), many, map(vec_len))]
        usize,
    ),

    /// Silence logs except for errors
    #[bpaf(short, long)]
    Quiet,
}

impl Default for Verbosity {
    fn default() -> Self {
        Verbosity::Verbose(0)
    }
}

#[derive(Bpaf)]
#[bpaf(options, version, descr(POKEDEX_DESCRIPTION))]
pub struct PokedexCli(#[bpaf(external(pokedex_args))] pub PokedexArgs);

/// Main pokedex args parser
///
/// To parse the pokedex CLI, use [`PokedexCli`] instead using [`pokedex_cli()`].
#[derive(Debug, Bpaf)]
#[bpaf(ignore_rustdoc)] // we don't want this struct to be interpreted as a group
pub struct PokedexArgs {
    /// Verbose mode
    ///
    /// Invoke multiple times for increasing detail.
    #[bpaf(external, fallback(Default::default()))]
    pub verbosity: Verbosity,

    #[bpaf(external(commands))]
    command: Commands,
}

impl PokedexArgs {
    pub async fn handle(self, config: Config) -> Result<()> {
        debug!(command = ?self.command, "running command");
        let client = Arc::new(init_catalog_client(&config)?);

        match self.command {
            Commands::List(args) => args.handle(config, client).await?,
            Commands::Search(args) => args.handle(config, client).await?,
            Commands::Show(args) => args.handle(config, client).await?,
        }
        Ok(())
    }
}

#[derive(Bpaf, Clone)]
enum Commands {
    /// List one page of the catalog
    #[bpaf(command)]
    List(#[bpaf(external(list::list))] list::List),

    /// Search species by name across the whole catalog
    #[bpaf(command)]
    Search(#[bpaf(external(search::search))] search::Search),

    /// Show height, weight, types and base stats of a species
    #[bpaf(command)]
    Show(#[bpaf(external(show::show))] show::Show),
}

impl fmt::Debug for Commands {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Commands::List(_) => write!(f, "list"),
            Commands::Search(_) => write!(f, "search"),
            Commands::Show(_) => write!(f, "show"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> PokedexArgs {
        let PokedexCli(args) = pokedex_cli()
            .run_inner(args)
            .unwrap_or_else(|err| panic!("failed to parse {args:?}: {err:?}"));
        args
    }

    #[test]
    fn parses_verbosity() {
        assert!(matches!(
            parse(&["-vv", "list"]).verbosity,
            Verbosity::Verbose(2)
        ));
        assert!(matches!(parse(&["-q", "list"]).verbosity, Verbosity::Quiet));
        assert!(matches!(
            parse(&["list"]).verbosity,
            Verbosity::Verbose(0)
        ));
    }

    #[test]
    fn parses_subcommands() {
        let args = parse(&["list", "--page", "3", "--json"]);
        assert!(matches!(
            args.command,
            Commands::List(list::List {
                page: 3,
                json: true
            })
        ));

        let args = parse(&["search", "char"]);
        assert!(
            matches!(&args.command, Commands::Search(search::Search { query, json: false }) if query == "char")
        );

        let args = parse(&["show", "25"]);
        assert!(matches!(
            args.command,
            Commands::Show(show::Show { id: 25, json: false })
        ));
    }

    #[test]
    fn list_defaults_to_first_page() {
        let args = parse(&["list"]);
        assert!(matches!(
            args.command,
            Commands::List(list::List {
                page: 1,
                json: false
            })
        ));
    }
}
