//! Console action provider.
//!
//! Stands in for the table hardware (rotary menu + OLED panels): prompts on
//! stdout, reads one command per line from stdin, and turns it into a
//! player action. The engine re-prompts through the runtime loop whenever
//! an action is rejected.

use async_trait::async_trait;
use tokio::io::{AsyncBufReadExt, BufReader, Lines, Stdin};
use tokio::sync::Mutex;

use game_core::{
    AcceptTradeAction, BuildCityAction, BuildRoadAction, BuildSettlementAction, BuyDevCardAction,
    DevCardPlay, DiceRoll, DiscardAction, EdgeId, EndTurnAction, GameState, HexId,
    PlayDevCardAction, PlayerActionKind, PlayerId, ProposeTradeAction, Resource, ResourceSet,
    RollAction, SetupPlaceAction, TurnPhase, VertexId,
};
use runtime::{ActionProvider, Result, RuntimeError};

pub struct ConsoleProvider {
    lines: Mutex<Lines<BufReader<Stdin>>>,
}

impl ConsoleProvider {
    pub fn new() -> Self {
        Self {
            lines: Mutex::new(BufReader::new(tokio::io::stdin()).lines()),
        }
    }

    fn prompt(seat: PlayerId, state: &GameState) {
        match state.turn.phase {
            TurnPhase::Setup => {
                println!("[{seat}] setup placement: setup <vertex> <edge>");
            }
            TurnPhase::Roll => {
                println!("[{seat}] roll the dice: roll [die1 die2]");
            }
            TurnPhase::Discard => {
                let owed = state.turn.owed_discards(seat);
                println!(
                    "[{seat}] discard {owed}: discard <wood> <brick> <sheep> <wheat> <ore>"
                );
            }
            TurnPhase::Action => {
                println!(
                    "[{seat}] action: road <e> | settlement <v> | city <v> | buy | \
                     play <card...> | trade <give> <get> | accept | end"
                );
            }
            phase => {
                println!("[{seat}] waiting ({phase:?})");
            }
        }
    }
}

impl Default for ConsoleProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ActionProvider for ConsoleProvider {
    async fn provide_action(&self, seat: PlayerId, state: &GameState) -> Result<PlayerActionKind> {
        let mut lines = self.lines.lock().await;
        loop {
            Self::prompt(seat, state);
            let line = lines
                .next_line()
                .await
                .ok()
                .flatten()
                .ok_or(RuntimeError::ScriptExhausted)?;
            match parse_command(seat, line.trim()) {
                Some(kind) => return Ok(kind),
                None => println!("unrecognized command: {line}"),
            }
        }
    }
}

fn parse_resource(word: &str) -> Option<Resource> {
    match word {
        "wood" => Some(Resource::Wood),
        "brick" => Some(Resource::Brick),
        "sheep" => Some(Resource::Sheep),
        "wheat" => Some(Resource::Wheat),
        "ore" => Some(Resource::Ore),
        _ => None,
    }
}

fn parse_command(seat: PlayerId, line: &str) -> Option<PlayerActionKind> {
    let words: Vec<&str> = line.split_whitespace().collect();
    match words.as_slice() {
        ["roll"] => Some(PlayerActionKind::Roll(RollAction::new(seat))),
        ["roll", d1, d2] => {
            let dice = DiceRoll::new(d1.parse().ok()?, d2.parse().ok()?);
            Some(PlayerActionKind::Roll(RollAction::with_dice(seat, dice)))
        }
        ["setup", vertex, edge] => Some(PlayerActionKind::SetupPlace(SetupPlaceAction {
            actor: seat,
            vertex: VertexId(vertex.parse().ok()?),
            edge: EdgeId(edge.parse().ok()?),
        })),
        ["road", edge] => Some(PlayerActionKind::BuildRoad(BuildRoadAction {
            actor: seat,
            edge: EdgeId(edge.parse().ok()?),
        })),
        ["settlement", vertex] => Some(PlayerActionKind::BuildSettlement(BuildSettlementAction {
            actor: seat,
            vertex: VertexId(vertex.parse().ok()?),
        })),
        ["city", vertex] => Some(PlayerActionKind::BuildCity(BuildCityAction {
            actor: seat,
            vertex: VertexId(vertex.parse().ok()?),
        })),
        ["buy"] => Some(PlayerActionKind::BuyDevCard(BuyDevCardAction { actor: seat })),
        ["play", "knight"] => Some(PlayerActionKind::PlayDevCard(PlayDevCardAction {
            actor: seat,
            play: DevCardPlay::Knight { robber_to: None },
        })),
        ["play", "knight", hex] => Some(PlayerActionKind::PlayDevCard(PlayDevCardAction {
            actor: seat,
            play: DevCardPlay::Knight {
                robber_to: Some(HexId(hex.parse().ok()?)),
            },
        })),
        ["play", "roads"] => Some(PlayerActionKind::PlayDevCard(PlayDevCardAction {
            actor: seat,
            play: DevCardPlay::RoadBuilding,
        })),
        ["play", "plenty", first, second] => Some(PlayerActionKind::PlayDevCard(
            PlayDevCardAction {
                actor: seat,
                play: DevCardPlay::YearOfPlenty {
                    first: parse_resource(first)?,
                    second: parse_resource(second)?,
                },
            },
        )),
        ["play", "monopoly", resource] => Some(PlayerActionKind::PlayDevCard(
            PlayDevCardAction {
                actor: seat,
                play: DevCardPlay::Monopoly {
                    resource: parse_resource(resource)?,
                },
            },
        )),
        ["trade", give, get] => Some(PlayerActionKind::ProposeTrade(ProposeTradeAction {
            actor: seat,
            give: parse_resource(give)?,
            get: parse_resource(get)?,
        })),
        ["accept"] => Some(PlayerActionKind::AcceptTrade(AcceptTradeAction {
            actor: seat,
        })),
        ["discard", wood, brick, sheep, wheat, ore] => {
            let cards = ResourceSet::from_pairs(&[
                (Resource::Wood, wood.parse().ok()?),
                (Resource::Brick, brick.parse().ok()?),
                (Resource::Sheep, sheep.parse().ok()?),
                (Resource::Wheat, wheat.parse().ok()?),
                (Resource::Ore, ore.parse().ok()?),
            ]);
            Some(PlayerActionKind::Discard(DiscardAction {
                actor: seat,
                cards,
            }))
        }
        ["end"] => Some(PlayerActionKind::EndTurn(EndTurnAction { actor: seat })),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_core_commands() {
        let seat = PlayerId(1);
        assert!(matches!(
            parse_command(seat, "roll 3 4"),
            Some(PlayerActionKind::Roll(RollAction {
                dice: Some(DiceRoll { die_1: 3, die_2: 4 }),
                ..
            }))
        ));
        assert!(matches!(
            parse_command(seat, "settlement 12"),
            Some(PlayerActionKind::BuildSettlement(BuildSettlementAction {
                vertex: VertexId(12),
                ..
            }))
        ));
        assert!(matches!(
            parse_command(seat, "trade wood brick"),
            Some(PlayerActionKind::ProposeTrade(_))
        ));
        assert!(parse_command(seat, "fly to the moon").is_none());
    }

    #[test]
    fn discard_command_collects_all_five_kinds() {
        let Some(PlayerActionKind::Discard(action)) =
            parse_command(PlayerId(0), "discard 1 0 2 0 1")
        else {
            panic!("expected a discard");
        };
        assert_eq!(action.cards.total(), 4);
        assert_eq!(action.cards.get(Resource::Sheep), 2);
    }
}
