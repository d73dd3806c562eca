//! Prompt templates for ranked-list generation, one per category.
//!
//! The output schema is enforced by the model client; the prompts set
//! curation criteria and which optional fields matter for the category.

use factweave_common::{Category, TimePeriod};

pub fn list_prompt(category: &Category, count: usize, period: TimePeriod) -> String {
    let time_text = period.phrase();
    match category {
        Category::Movies => movies_prompt(count, &time_text),
        Category::Sports => sports_prompt(count, &time_text),
        Category::Music => music_prompt(count, &time_text),
        Category::Games => games_prompt(count, &time_text),
        Category::Other(name) => generic_prompt(name, count, &time_text),
    }
}

fn movies_prompt(count: usize, time_text: &str) -> String {
    format!(
        "Create a backlog of the top {count} best movies {time_text}.\n\
         \n\
         TASK: Generate a curated list of {count} essential films that represent the highest quality and most influential cinema {time_text}.\n\
         \n\
         For each film provide:\n\
         - title: the official title\n\
         - creator: the director\n\
         - year: release year\n\
         - description: why this is considered a top film (50-100 characters)\n\
         - genres: 2-3 specific genre tags (e.g. Drama, Crime, Epic)\n\
         - rank: integer from 1 to {count}, 1 is the best\n\
         - estimated_time: runtime, e.g. \"2h 55m\"\n\
         - rating: IMDB or critical consensus rating\n\
         - accolades: notable awards won, if any\n\
         \n\
         Focus on critically acclaimed and culturally significant films {time_text}."
    )
}

fn sports_prompt(count: usize, time_text: &str) -> String {
    format!(
        "Create a backlog of the top {count} greatest sports moments and achievements {time_text}.\n\
         \n\
         TASK: Generate a curated list of {count} essential sports events, performances, or achievements that represent the pinnacle of athletic excellence {time_text}.\n\
         \n\
         For each entry provide:\n\
         - title: name of the event, game, or achievement\n\
         - creator: the athlete(s) or team\n\
         - genres: the team, league, or discipline involved\n\
         - rank: integer from 1 to {count}, 1 is the best\n\
         - rating: a statistical score appropriate to the sport\n\
         - accolades: awards such as \"MVP\" or \"World Champion\"\n\
         \n\
         Focus on legendary performances and moments that defined sports history {time_text}."
    )
}

fn music_prompt(count: usize, time_text: &str) -> String {
    format!(
        "Create a backlog of the top {count} greatest albums {time_text}.\n\
         \n\
         TASK: Generate a curated list of {count} essential albums that represent the highest quality and most influential music {time_text}.\n\
         \n\
         For each album provide:\n\
         - title: the official album title\n\
         - creator: the artist or band\n\
         - year: release year\n\
         - genres: one specific genre tag (e.g. Progressive Rock, Hip-Hop, Jazz)\n\
         - rank: integer from 1 to {count}, 1 is the best\n\
         \n\
         Focus on critically acclaimed and culturally influential albums {time_text}."
    )
}

fn games_prompt(count: usize, time_text: &str) -> String {
    format!(
        "Create a backlog of the top {count} greatest video games {time_text}.\n\
         \n\
         TASK: Generate a curated list of {count} essential video games that represent the highest quality and most influential gaming experiences {time_text}.\n\
         \n\
         For each game provide:\n\
         - title: the official game title\n\
         - creator: the developer or studio\n\
         - year: release year\n\
         - description: why this is considered a classic (50-100 characters)\n\
         - genres: one specific genre tag (e.g. Action-Adventure, RPG, Platformer)\n\
         - rank: integer from 1 to {count}, 1 is the best\n\
         - rating: critical consensus rating, e.g. \"10/10\"\n\
         - accolades: awards such as \"Game of the Year\" or \"Best Design\"\n\
         \n\
         Focus on games that pushed boundaries and influenced the medium {time_text}."
    )
}

fn generic_prompt(category: &str, count: usize, time_text: &str) -> String {
    format!(
        "Create a backlog of the top {count} best {category} {time_text}.\n\
         \n\
         TASK: Generate a curated list of {count} essential {category} that represent the highest quality and most influential works in this field {time_text}.\n\
         \n\
         For each item provide:\n\
         - title: the official title of the work\n\
         - creator: the creator, author, developer, or artist\n\
         - year: release or publication year\n\
         - description: why this is considered top-tier (50-100 characters)\n\
         - genres: 2-3 specific sub-category tags\n\
         - rank: integer from 1 to {count}, 1 is the best\n\
         - estimated_time: time to complete or consume, e.g. \"2 hours\", \"300 pages\"\n\
         \n\
         Focus on widely acclaimed and influential {category} {time_text}."
    )
}
