use anyhow::{Context, Result, bail};

use roster_terminal::config::Config;
use roster_terminal::roster_fetch::{FailureKind, RosterClient, failure_kind};
use roster_terminal::state::{NewPlayer, PlayerId};
use roster_terminal::view::{UNASSIGNED_TEAM, format_joined};

const USAGE: &str = concat!(
    "usage: roster_cli list | show <id> ",
    "| add <name> <breed> <description> <imageUrl> | remove <id>"
);

fn main() -> Result<()> {
    let _ = dotenvy::from_filename(".env.local");
    let _ = dotenvy::from_filename(".env");
    let config = Config::from_env();
    let client = RosterClient::from_config(&config);

    let args = std::env::args().skip(1).collect::<Vec<_>>();
    let Some(command) = args.first() else {
        eprintln!("{USAGE}");
        return Ok(());
    };

    let res = match command.as_str() {
        "list" => client.list_players().map(|players| {
            if players.is_empty() {
                println!("No players on the roster yet.");
            }
            for player in players {
                println!("{:>6}  {:<24} {}", player.id, player.name, player.breed);
            }
        }),
        "show" => {
            let id = parse_id(args.get(1))?;
            client.get_player(id).map(|player| {
                println!("{} #{}", player.name, player.id);
                println!("  breed:  {}", player.breed);
                println!("  status: {}", player.status);
                println!(
                    "  team:   {}",
                    player.team_name.as_deref().unwrap_or(UNASSIGNED_TEAM)
                );
                println!("  image:  {}", player.image_url);
                if let Some(joined) = player.created_at.as_deref().and_then(format_joined) {
                    println!("  joined: {joined}");
                }
            })
        }
        "add" => {
            let [name, breed, description, image_url] = match &args[1..] {
                [a, b, c, d] => [a, b, c, d],
                _ => bail!("{USAGE}"),
            };
            let new_player = NewPlayer {
                name: name.clone(),
                breed: breed.clone(),
                description: description.clone(),
                image_url: image_url.clone(),
            };
            if let Some(field) = new_player.missing_field() {
                bail!("{field} is required");
            }
            client.create_player(&new_player).map(|created| match created {
                Some(player) => println!("OK  invited {} (#{})", player.name, player.id),
                None => println!("OK  invited {}", new_player.name),
            })
        }
        "remove" => {
            let id = parse_id(args.get(1))?;
            client
                .delete_player(id)
                .map(|()| println!("OK  removed player #{id}"))
        }
        other => bail!("unknown command {other:?}\n{USAGE}"),
    };

    if let Err(err) = res {
        eprintln!("ERR {err:#}");
        let code = match failure_kind(&err) {
            Some(FailureKind::Network) => 2,
            Some(FailureKind::Decode) => 3,
            Some(FailureKind::Rejected) => 4,
            None => 1,
        };
        std::process::exit(code);
    }
    Ok(())
}

fn parse_id(raw: Option<&String>) -> Result<PlayerId> {
    let raw = raw.context("missing player id")?;
    raw.trim()
        .parse::<PlayerId>()
        .with_context(|| format!("invalid player id {raw:?}"))
}
