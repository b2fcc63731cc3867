// Filename parsing: `TEAM_PLAYER.ext` -> (team, player).

/// Team and player tokens recovered from a roster filename.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RosterIdentity {
    pub team: String,
    pub player: String,
}

impl RosterIdentity {
    /// Both tokens carry text. Files with an empty token are ignored by the
    /// pipeline even though they parse.
    pub fn is_complete(&self) -> bool {
        !self.team.is_empty() && !self.player.is_empty()
    }
}

/// Parse a roster filename.
///
/// `-` becomes a space, then the name is split on `_`. The first token is the
/// team (verbatim), the second is the player with its extension removed. Any
/// further tokens are ignored. Returns `None` when there is no `_` at all.
pub fn extract_identity(filename: &str) -> Option<RosterIdentity> {
    let spaced = filename.replace('-', " ");
    let mut tokens = spaced.split('_');
    let team = tokens.next()?;
    let player = tokens.next()?;

    Some(RosterIdentity {
        team: team.to_string(),
        player: strip_extension(player).to_string(),
    })
}

/// Drop the last `.ext` from a token. Leading dots do not start an extension,
/// so `.hidden` is returned unchanged.
fn strip_extension(token: &str) -> &str {
    let leading = token.len() - token.trim_start_matches('.').len();
    match token[leading..].rfind('.') {
        Some(i) => &token[..leading + i],
        None => token,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
