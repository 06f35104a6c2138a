//! Turning a user command into the command that runs.

use rand::Rng;

use crate::{AliasTable, PoolRegistry};

/// Command head that triggers a draw.
pub const DRAW_TRIGGER: &str = "gacha";
/// Marker command returned for `gacha rates <pool>`.
pub const RATES_COMMAND: &str = "__gacha_rates";
const RATES_ARGUMENT: &str = "rates";

/// A command head and its arguments after remapping.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemappedCommand {
    /// Command to run.
    pub command: String,
    /// Arguments in order.
    pub args: Vec<String>,
}

/// Applies aliases and draws to incoming commands.
///
/// Either part may be absent; a missing alias table leaves commands as
/// typed, and a missing pool registry makes every draw empty.
#[derive(Debug, Clone, Default)]
pub struct CommandRemapper {
    aliases: Option<AliasTable>,
    pools: Option<PoolRegistry>,
}

impl CommandRemapper {
    /// Combine an alias table and a pool registry.
    #[must_use]
    pub const fn new(aliases: Option<AliasTable>, pools: Option<PoolRegistry>) -> Self {
        Self { aliases, pools }
    }

    /// Alias table, if configured.
    #[must_use]
    pub const fn aliases(&self) -> Option<&AliasTable> {
        self.aliases.as_ref()
    }

    /// Pool registry, if configured.
    #[must_use]
    pub const fn pools(&self) -> Option<&PoolRegistry> {
        self.pools.as_ref()
    }

    /// Remap `command` with caller arguments `args`.
    ///
    /// The alias expansion replaces `command`; its extra tokens precede
    /// `args`. When the resulting head is [`DRAW_TRIGGER`], the next token
    /// names a pool and the drawn outcome becomes the new command, with its
    /// own extra tokens ahead of the remaining arguments. `gacha rates
    /// <pool>` yields [`RATES_COMMAND`] instead of drawing.
    ///
    /// Returns `None` when a draw has no pool name or yields nothing.
    pub fn remap<R: Rng + ?Sized>(
        &self,
        command: &str,
        args: &[String],
        rng: &mut R,
    ) -> Option<RemappedCommand> {
        let expansion = self
            .aliases
            .as_ref()
            .and_then(|aliases| aliases.resolve(command))
            .map(|line| line.split_whitespace().collect::<Vec<_>>())
            .filter(|tokens| !tokens.is_empty())
            .unwrap_or_else(|| vec![command]);
        let mut tokens = expansion
            .into_iter()
            .map(str::to_owned)
            .chain(args.iter().cloned());
        let head = tokens.next()?;
        if head != DRAW_TRIGGER {
            return Some(RemappedCommand {
                command: head,
                args: tokens.collect(),
            });
        }

        let Some(pool) = tokens.next() else {
            log::debug!("`{DRAW_TRIGGER}` used without a pool name");
            return None;
        };
        if pool == RATES_ARGUMENT {
            return Some(RemappedCommand {
                command: RATES_COMMAND.to_owned(),
                args: tokens.collect(),
            });
        }
        let drawn = self.pools.as_ref()?.draw(&pool, rng)?;
        log::debug!("pool `{pool}` drew `{drawn}`");
        let mut drawn_tokens = drawn.split_whitespace().map(str::to_owned);
        let drawn_head = drawn_tokens.next()?;
        Some(RemappedCommand {
            command: drawn_head,
            args: drawn_tokens.chain(tokens).collect(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;
    use rstest::{fixture, rstest};
    use serde_json::json;

    #[fixture]
    fn remapper() -> CommandRemapper {
        let aliases = AliasTable::from_value(&json!({
            "play": ["p"],
            "play --shuffle": ["shuffle"],
            "gacha songs": ["roll"],
            "gacha rates": ["odds"],
        }))
        .expect("aliases");
        let pools = PoolRegistry::from_value(&json!({
            "songs": {"play https://example.com/song": 1},
            "dud": {"play": 0},
        }))
        .expect("pools");
        CommandRemapper::new(Some(aliases), Some(pools))
    }

    fn args(raw: &[&str]) -> Vec<String> {
        raw.iter().map(|arg| (*arg).to_owned()).collect()
    }

    fn remap(
        remapper: &CommandRemapper,
        command: &str,
        raw_args: &[&str],
    ) -> Option<RemappedCommand> {
        let mut rng = ChaCha8Rng::seed_from_u64(0);
        remapper.remap(command, &args(raw_args), &mut rng)
    }

    fn expected(command: &str, raw_args: &[&str]) -> Option<RemappedCommand> {
        Some(RemappedCommand {
            command: command.to_owned(),
            args: args(raw_args),
        })
    }

    #[rstest]
    #[case("skip", &["now"], "skip", &["now"])]
    #[case("p", &["song"], "play", &["song"])]
    #[case("shuffle", &["list"], "play", &["--shuffle", "list"])]
    fn aliases_expand_ahead_of_arguments(
        remapper: CommandRemapper,
        #[case] command: &str,
        #[case] raw_args: &[&str],
        #[case] head: &str,
        #[case] remapped_args: &[&str],
    ) {
        assert_eq!(
            remap(&remapper, command, raw_args),
            expected(head, remapped_args)
        );
    }

    #[rstest]
    fn draw_result_is_spliced_before_remaining_arguments(remapper: CommandRemapper) {
        assert_eq!(
            remap(&remapper, "gacha", &["songs", "loud"]),
            expected("play", &["https://example.com/song", "loud"])
        );
    }

    #[rstest]
    fn aliased_draw_names_its_pool(remapper: CommandRemapper) {
        assert_eq!(
            remap(&remapper, "roll", &["loud"]),
            expected("play", &["https://example.com/song", "loud"])
        );
    }

    #[rstest]
    #[case("gacha", &["rates", "songs"])]
    #[case("odds", &["songs"])]
    fn rates_bypass_the_draw(
        remapper: CommandRemapper,
        #[case] command: &str,
        #[case] raw_args: &[&str],
    ) {
        assert_eq!(
            remap(&remapper, command, raw_args),
            expected(RATES_COMMAND, &["songs"])
        );
    }

    #[rstest]
    #[case(&["dud"])]
    #[case(&["unknown"])]
    #[case(&[])]
    fn empty_draws_give_nothing(remapper: CommandRemapper, #[case] raw_args: &[&str]) {
        assert_eq!(remap(&remapper, "gacha", raw_args), None);
    }

    #[rstest]
    fn missing_parts_fall_back_to_plain_commands() {
        let bare = CommandRemapper::default();

        assert_eq!(remap(&bare, "p", &["song"]), expected("p", &["song"]));
        assert_eq!(remap(&bare, "gacha", &["songs"]), None);
    }
}
