//! The trade-evaluation prompt. Output is fully determined by the two
//! summaries.

use crate::analysis::PlayerSummary;

const INTRO: &str = "I need help evaluating a potential trade between two players based on their current season's stats, injury history, and overall performance. Here are the detailed stats for both players:";

const INSTRUCTIONS: &str = "Please provide the analysis in the following format:

Start by summarizing the games played and who has the edge in health and availability. Discuss the injury history of both players, mentioning any significant injuries and missed games. Compare their performance stats (points, efficiency, rebounds, assists, etc.). Conclude by discussing versatility and reliability, identifying who is the better trade overall, and why.";

fn player_block(out: &mut String, index: usize, player: &PlayerSummary) {
    let stats = &player.stats;
    out.push_str(&format!(
        "Player {index} ({name}):
Games Played: {games}
Minutes Per Game: {minutes}
Field Goal Percentage: {fg}
Points: {points}
Rebounds: {rebounds}
Assists: {assists}
Turnovers: {turnovers}
Last Season Injuries: {injuries}
",
        name = player.name,
        games = stats.games_played,
        minutes = stats.minutes_per_game,
        fg = stats.field_goal_percentage,
        points = stats.points,
        rebounds = stats.rebounds,
        assists = stats.assists,
        turnovers = stats.turnovers,
        injuries = stats.last_season_injuries,
    ));
}

/// Prompt comparing the traded player (Player 1) with the received one (Player 2).
pub fn build_trade_prompt(traded: &PlayerSummary, received: &PlayerSummary) -> String {
    let mut prompt = String::with_capacity(1536);
    prompt.push_str(INTRO);
    prompt.push_str("\n\n");
    player_block(&mut prompt, 1, traded);
    prompt.push('\n');
    player_block(&mut prompt, 2, received);
    prompt.push('\n');
    prompt.push_str(INSTRUCTIONS);
    prompt
}
