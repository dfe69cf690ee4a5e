//! Trigger strings: `marker[@animation]` tokens separated by commas.

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TriggerToken {
    pub marker: String,
    /// `None` targets the default animation.
    pub animation: Option<String>,
}

/// Result of splitting a trigger value.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ParsedTrigger {
    pub tokens: Vec<TriggerToken>,
    /// Raw tokens that could not be parsed.
    pub malformed: Vec<String>,
}

/// Split `value` into tokens. Malformed tokens are collected separately and
/// never prevent the well-formed ones from running.
pub fn parse_trigger(value: &str) -> ParsedTrigger {
    let mut parsed = ParsedTrigger::default();
    for raw in value.split(',') {
        let token = raw.trim();
        match parse_token(token) {
            Some(t) => parsed.tokens.push(t),
            None => parsed.malformed.push(token.to_string()),
        }
    }
    parsed
}

fn parse_token(token: &str) -> Option<TriggerToken> {
    if token.is_empty() {
        return None;
    }
    let mut parts = token.split('@');
    let marker = parts.next()?.trim();
    let animation = parts.next().map(str::trim);
    if parts.next().is_some() || marker.is_empty() || animation == Some("") {
        return None;
    }
    Some(TriggerToken {
        marker: marker.to_string(),
        animation: animation.map(str::to_string),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tok(marker: &str, animation: Option<&str>) -> TriggerToken {
        TriggerToken {
            marker: marker.into(),
            animation: animation.map(Into::into),
        }
    }

    #[test]
    fn splits_qualified_and_plain_tokens() {
        let p = parse_trigger("jump@Anim1, stop@Anim2,idle");
        assert_eq!(
            p.tokens,
            vec![tok("jump", Some("Anim1")), tok("stop", Some("Anim2")), tok("idle", None)]
        );
        assert!(p.malformed.is_empty());
    }

    #[test]
    fn malformed_tokens_are_skipped() {
        let p = parse_trigger("a,,@B, c@ ,d@e@f, ok");
        assert_eq!(p.tokens, vec![tok("a", None), tok("ok", None)]);
        assert_eq!(p.malformed, vec!["", "@B", "c@", "d@e@f"]);
    }
}
