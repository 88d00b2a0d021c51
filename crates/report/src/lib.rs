//! Plain-text rendering of ranked recommendations and taste profiles.
//!
//! Reports are written for people, not machines: one block per title with
//! the normalized score, the community mean, and per-user lines explaining
//! where the recommendation came from. Taste profiles list one dimension's
//! ranked attributes, one per line.
//!
//! ## Example Usage
//! ```ignore
//! use report::{report_file_name, write_report, UserOrigins};
//!
//! let path = report_file_name(&names);
//! let mut out = File::create(&path)?;
//! write_report(&mut out, &recommendations, &[UserOrigins {
//!     user: "ayla",
//!     origins: &result.origins,
//! }])?;
//! ```

use std::io::{self, Write};

use pipeline::{Dimension, MediaOrigins, Origins, ScoredRec, TasteProfile};

/// One user's origin notes, paired with their display name.
#[derive(Debug, Clone, Copy)]
pub struct UserOrigins<'a> {
    pub user: &'a str,
    pub origins: &'a Origins,
}

/// File the joint report is written to, one name per participating user.
pub fn report_file_name(users: &[String]) -> String {
    format!("{}-recs.txt", users.join("-"))
}

/// File one dimension of a user's taste profile is written to.
pub fn profile_file_name(user: &str, dimension: Dimension) -> String {
    format!("{}-{}.txt", user, dimension.label())
}

/// Writes the ranked recommendation report.
///
/// Every title gets a header line and the community mean when AniList
/// has one, then a block per user: their name, one line per reason the
/// pipeline found, and a blank line closing the block. Users without
/// notes for a title still get their name line so blocks stay aligned
/// across the report.
pub fn write_report<W: Write>(
    out: &mut W,
    recs: &[ScoredRec],
    users: &[UserOrigins<'_>],
) -> io::Result<()> {
    for rec in recs {
        let media = &rec.media;
        let format = media.format.as_deref().unwrap_or("?");
        match media.release_year() {
            Some(year) => writeln!(
                out,
                "{} ({}, {}): {:.2}%",
                media.display_title(),
                format,
                year,
                rec.score
            )?,
            None => writeln!(
                out,
                "{} ({}, ?): {:.2}%",
                media.display_title(),
                format,
                rec.score
            )?,
        }
        if let Some(mean) = media.mean_score {
            writeln!(out, "\tother users rated it {}%", mean)?;
            writeln!(out)?;
        }
        for user in users {
            writeln!(out, "\t{}", user.user)?;
            if let Some(noted) = user.origins.get(&rec.id()) {
                write_origin_lines(out, noted)?;
            }
            writeln!(out)?;
        }
    }
    Ok(())
}

/// One line per reason, in a fixed order so reports are comparable.
fn write_origin_lines<W: Write>(out: &mut W, noted: &MediaOrigins) -> io::Result<()> {
    if let Some(rating) = noted.user_rating {
        writeln!(out, "\tYou rated this {}%", rating)?;
    }
    if !noted.liked.is_empty() {
        let titles: Vec<&str> = noted.liked.values().map(String::as_str).collect();
        writeln!(out, "\tbecause you liked {}", titles.join(", "))?;
    }
    if !noted.tags.is_empty() {
        let names: Vec<&str> = noted.tags.values().map(|tag| tag.name.as_str()).collect();
        writeln!(out, "\t{} {}", Dimension::Tags.origin_phrase(), names.join(", "))?;
    }
    if !noted.studios.is_empty() {
        let names: Vec<&str> = noted
            .studios
            .values()
            .map(|studio| studio.name.as_str())
            .collect();
        writeln!(out, "\t{} {}", Dimension::Studios.origin_phrase(), names.join(", "))?;
    }
    if !noted.staff.is_empty() {
        let names: Vec<&str> = noted
            .staff
            .values()
            .map(|person| person.display_name())
            .collect();
        writeln!(out, "\t{} {}", Dimension::Staff.origin_phrase(), names.join(", "))?;
    }
    if !noted.genres.is_empty() {
        let names: Vec<&str> = noted.genres.iter().map(String::as_str).collect();
        writeln!(out, "\t{} {}", Dimension::Genres.origin_phrase(), names.join(", "))?;
    }
    for decade in &noted.decades {
        writeln!(out, "\t{} {}s", Dimension::Decades.origin_phrase(), decade)?;
    }
    Ok(())
}

/// Writes one dimension of a taste profile, strongest affinity first.
pub fn write_taste_profile<W: Write>(
    out: &mut W,
    profile: &TasteProfile,
    dimension: Dimension,
) -> io::Result<()> {
    match dimension {
        Dimension::Tags => {
            for entry in profile.tags.ranked() {
                writeln!(out, "{}: {:.2}%", entry.value.name, entry.score)?;
            }
        }
        Dimension::Studios => {
            for entry in profile.studios.ranked() {
                writeln!(out, "{}: {:.2}%", entry.value.name, entry.score)?;
            }
        }
        Dimension::Staff => {
            for entry in profile.staff.ranked() {
                writeln!(out, "{}: {:.2}%", entry.value.display_name(), entry.score)?;
            }
        }
        Dimension::Genres => {
            for entry in profile.genres.ranked() {
                writeln!(out, "{}: {:.2}%", entry.key, entry.score)?;
            }
        }
        Dimension::Decades => {
            for entry in profile.decades.ranked() {
                writeln!(out, "{}: {:.2}%", entry.key, entry.score)?;
            }
        }
    }
    Ok(())
}
