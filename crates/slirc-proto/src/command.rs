//! IRC command types.
//!
//! `Command` models exactly the command table this server dispatches. Parsing
//! from a tokenized line (see [`crate::message::parse`]) validates only the
//! argument counts that are required to build the variant; further semantic
//! validation (nickname/channel syntax, membership, etc.) happens in the
//! command handlers.

use crate::error::MessageParseError;

/// A parsed IRC command with its arguments.
#[derive(Clone, PartialEq, Eq, Debug)]
#[non_exhaustive]
pub enum Command {
    /// `PASS <password>`
    PASS(String),
    /// `CAP <subcommand> [params]`
    CAP(String, Option<String>),
    /// `NICK <nickname>`
    NICK(String),
    /// `USER <user> <mode> <unused> :<realname>`
    USER(String, String, String, String),
    /// `JOIN <channels> [<keys>]`
    JOIN(String, Option<String>),
    /// `PART <channels> [:<message>]`
    PART(String, Option<String>),
    /// `PRIVMSG <target> :<text>`
    PRIVMSG(String, String),
    /// `NOTICE <target> :<text>`
    NOTICE(String, String),
    /// `TOPIC <channel> [:<topic>]`
    TOPIC(String, Option<String>),
    /// `MODE <target> [<flag> [<arg>]]`
    MODE(String, Option<String>, Option<String>),
    /// `NAMES [<channels>]`
    NAMES(Option<String>),
    /// `LIST [<channels>]`
    LIST(Option<String>),
    /// `WHO [<target>]`
    WHO(Option<String>),
    /// `WHOIS <nickname>`
    WHOIS(String),
    /// `ISON <nickname> [<nickname> ...]`
    ISON(Vec<String>),
    /// `LUSERS`
    LUSERS,
    /// `MOTD`
    MOTD,
    /// `PING [:<origin>]`
    PING(Option<String>),
    /// `PONG [:<origin>]`
    PONG(Option<String>),
    /// `AWAY [:<message>]`
    AWAY(Option<String>),
    /// `WALLOPS :<text>`
    WALLOPS(String),
    /// `QUIT [:<message>]`
    QUIT(Option<String>),
    /// Any command not in this server's table, kept verbatim for the
    /// "unknown command" (421) reply and for diagnostics.
    Raw(String, Vec<String>),
    /// A server-originated numeric reply (e.g. 001, 433); the `u16` is
    /// rendered zero-padded to three digits.
    Reply(u16, Vec<String>),
}

impl Command {
    /// Build a `Command` from an already-uppercased command name and its
    /// tokenized arguments.
    ///
    /// Only checks the argument counts needed to construct a variant; a
    /// missing argument here becomes [`MessageParseError::NotEnoughArguments`],
    /// which callers typically turn into numeric 461.
    pub fn new(command: &str, args: Vec<&str>) -> Result<Command, MessageParseError> {
        let a = |i: usize| args.get(i).map(|s| s.to_string());
        let req = |i: usize| -> Result<String, MessageParseError> {
            a(i).ok_or(MessageParseError::NotEnoughArguments {
                expected: i + 1,
                got: args.len(),
            })
        };

        Ok(match command {
            "PASS" => Command::PASS(req(0)?),
            "CAP" => Command::CAP(req(0)?, a(1)),
            "NICK" => Command::NICK(req(0)?),
            "USER" => Command::USER(req(0)?, req(1)?, req(2)?, req(3)?),
            "JOIN" => Command::JOIN(req(0)?, a(1)),
            "PART" => Command::PART(req(0)?, a(1)),
            "PRIVMSG" => Command::PRIVMSG(req(0)?, a(1).unwrap_or_default()),
            "NOTICE" => Command::NOTICE(req(0)?, a(1).unwrap_or_default()),
            "TOPIC" => Command::TOPIC(req(0)?, a(1)),
            "MODE" => Command::MODE(req(0)?, a(1), a(2)),
            "NAMES" => Command::NAMES(a(0)),
            "LIST" => Command::LIST(a(0)),
            "WHO" => Command::WHO(a(0)),
            "WHOIS" => Command::WHOIS(req(0)?),
            "ISON" => {
                if args.is_empty() {
                    return Err(MessageParseError::NotEnoughArguments {
                        expected: 1,
                        got: 0,
                    });
                }
                Command::ISON(args.iter().map(|s| s.to_string()).collect())
            }
            "LUSERS" => Command::LUSERS,
            "MOTD" => Command::MOTD,
            "PING" => Command::PING(a(0)),
            "PONG" => Command::PONG(a(0)),
            "AWAY" => Command::AWAY(a(0)),
            "WALLOPS" => Command::WALLOPS(a(0).unwrap_or_default()),
            "QUIT" => Command::QUIT(a(0)),
            other => Command::Raw(other.to_string(), args.into_iter().map(String::from).collect()),
        })
    }

    /// The command name as it appears on the wire (always uppercase for the
    /// commands this server knows about, or the numeric code for a reply).
    pub fn name(&self) -> String {
        match self {
            Command::PASS(_) => "PASS".to_string(),
            Command::CAP(_, _) => "CAP".to_string(),
            Command::NICK(_) => "NICK".to_string(),
            Command::USER(_, _, _, _) => "USER".to_string(),
            Command::JOIN(_, _) => "JOIN".to_string(),
            Command::PART(_, _) => "PART".to_string(),
            Command::PRIVMSG(_, _) => "PRIVMSG".to_string(),
            Command::NOTICE(_, _) => "NOTICE".to_string(),
            Command::TOPIC(_, _) => "TOPIC".to_string(),
            Command::MODE(_, _, _) => "MODE".to_string(),
            Command::NAMES(_) => "NAMES".to_string(),
            Command::LIST(_) => "LIST".to_string(),
            Command::WHO(_) => "WHO".to_string(),
            Command::WHOIS(_) => "WHOIS".to_string(),
            Command::ISON(_) => "ISON".to_string(),
            Command::LUSERS => "LUSERS".to_string(),
            Command::MOTD => "MOTD".to_string(),
            Command::PING(_) => "PING".to_string(),
            Command::PONG(_) => "PONG".to_string(),
            Command::AWAY(_) => "AWAY".to_string(),
            Command::WALLOPS(_) => "WALLOPS".to_string(),
            Command::QUIT(_) => "QUIT".to_string(),
            Command::Raw(name, _) => name.clone(),
            Command::Reply(code, _) => format!("{code:03}"),
        }
    }
}

impl std::fmt::Display for Command {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // `last` is always the final parameter of the line, so it always
        // needs the leading `:` regardless of whether it contains a space —
        // omitting it for single-word trailing params breaks wire framing
        // for anything reading the length-prefixed form.
        fn trailing(f: &mut std::fmt::Formatter<'_>, head: &str, last: &str) -> std::fmt::Result {
            write!(f, "{head} :{last}")
        }

        match self {
            Command::PASS(p) => write!(f, "PASS {p}"),
            Command::CAP(sub, arg) => match arg {
                Some(a) => trailing(f, &format!("CAP {sub}"), a),
                None => write!(f, "CAP {sub}"),
            },
            Command::NICK(n) => write!(f, "NICK {n}"),
            Command::USER(u, m, unused, r) => write!(f, "USER {u} {m} {unused} :{r}"),
            Command::JOIN(chans, keys) => match keys {
                Some(k) => write!(f, "JOIN {chans} {k}"),
                None => write!(f, "JOIN {chans}"),
            },
            Command::PART(chans, msg) => match msg {
                Some(m) => trailing(f, &format!("PART {chans}"), m),
                None => write!(f, "PART {chans}"),
            },
            Command::PRIVMSG(target, text) => trailing(f, &format!("PRIVMSG {target}"), text),
            Command::NOTICE(target, text) => trailing(f, &format!("NOTICE {target}"), text),
            Command::TOPIC(chan, topic) => match topic {
                Some(t) => trailing(f, &format!("TOPIC {chan}"), t),
                None => write!(f, "TOPIC {chan}"),
            },
            Command::MODE(target, flag, arg) => match (flag, arg) {
                (Some(flag), Some(arg)) => write!(f, "MODE {target} {flag} {arg}"),
                (Some(flag), None) => write!(f, "MODE {target} {flag}"),
                (None, _) => write!(f, "MODE {target}"),
            },
            Command::NAMES(chans) => match chans {
                Some(c) => write!(f, "NAMES {c}"),
                None => write!(f, "NAMES"),
            },
            Command::LIST(chans) => match chans {
                Some(c) => write!(f, "LIST {c}"),
                None => write!(f, "LIST"),
            },
            Command::WHO(target) => match target {
                Some(t) => write!(f, "WHO {t}"),
                None => write!(f, "WHO"),
            },
            Command::WHOIS(nick) => write!(f, "WHOIS {nick}"),
            Command::ISON(nicks) => write!(f, "ISON {}", nicks.join(" ")),
            Command::LUSERS => write!(f, "LUSERS"),
            Command::MOTD => write!(f, "MOTD"),
            Command::PING(origin) => match origin {
                Some(o) => trailing(f, "PING", o),
                None => write!(f, "PING"),
            },
            Command::PONG(origin) => match origin {
                Some(o) => trailing(f, "PONG", o),
                None => write!(f, "PONG"),
            },
            Command::AWAY(msg) => match msg {
                Some(m) => trailing(f, "AWAY", m),
                None => write!(f, "AWAY"),
            },
            Command::WALLOPS(text) => trailing(f, "WALLOPS", text),
            Command::QUIT(msg) => match msg {
                Some(m) => trailing(f, "QUIT", m),
                None => write!(f, "QUIT"),
            },
            Command::Raw(name, args) => {
                if args.is_empty() {
                    write!(f, "{name}")
                } else {
                    write!(f, "{name} {}", args.join(" "))
                }
            }
            Command::Reply(code, args) => {
                let head = format!("{code:03}");
                match args.split_last() {
                    Some((last, rest)) => {
                        if rest.is_empty() {
                            trailing(f, &head, last)
                        } else {
                            trailing(f, &format!("{head} {}", rest.join(" ")), last)
                        }
                    }
                    None => write!(f, "{head}"),
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builds_nick() {
        let cmd = Command::new("NICK", vec!["alice"]).unwrap();
        assert_eq!(cmd, Command::NICK("alice".to_string()));
    }

    #[test]
    fn missing_required_arg_errors() {
        let err = Command::new("NICK", vec![]).unwrap_err();
        assert!(matches!(
            err,
            MessageParseError::NotEnoughArguments { expected: 1, got: 0 }
        ));
    }

    #[test]
    fn unknown_command_is_raw() {
        let cmd = Command::new("XYZZY", vec!["a", "b"]).unwrap();
        assert_eq!(
            cmd,
            Command::Raw("XYZZY".to_string(), vec!["a".to_string(), "b".to_string()])
        );
    }

    #[test]
    fn privmsg_displays_with_colon() {
        let cmd = Command::PRIVMSG("#chan".to_string(), "hi there".to_string());
        assert_eq!(cmd.to_string(), "PRIVMSG #chan :hi there");
    }

    #[test]
    fn join_multiple_with_keys() {
        let cmd = Command::new("JOIN", vec!["#a,#b", "k1,k2"]).unwrap();
        assert_eq!(
            cmd,
            Command::JOIN("#a,#b".to_string(), Some("k1,k2".to_string()))
        );
    }
}
