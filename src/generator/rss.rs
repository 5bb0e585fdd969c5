//! RSS 2.0 output.

use super::{Feed, FeedEntry};
use crate::{error::BuildError, utils::date::DateTimeUtc};
use rss::{ChannelBuilder, GuidBuilder, ImageBuilder, ItemBuilder, validation::Validate};

/// Serialize `feed` as an RSS channel.
///
/// Fails when the channel does not validate, e.g. a link that is not a URL.
pub fn to_xml(feed: &Feed) -> Result<String, BuildError> {
    let link = feed.link.clone().unwrap_or_else(|| feed.id.clone());
    let items: Vec<_> = feed.entries.iter().map(entry_to_item).collect();

    let image = feed.logo.map(|logo| {
        ImageBuilder::default()
            .url(logo.to_owned())
            .title(feed.title.to_owned())
            .link(link.clone())
            .build()
    });

    let channel = ChannelBuilder::default()
        .title(feed.title.to_owned())
        .link(link)
        .description(feed.subtitle.unwrap_or(feed.description).to_owned())
        .language(Some(feed.language.to_owned()))
        .copyright(feed.rights.map(str::to_owned))
        .managing_editor(feed.author.map(str::to_owned))
        .last_build_date(Some(feed.updated.to_rfc2822()))
        .generator(Some(env!("CARGO_PKG_NAME").to_owned()))
        .image(image)
        .items(items)
        .build();

    channel
        .validate()
        .map_err(|e| BuildError::Feed(format!("rss validation failed: {e}")))?;
    Ok(channel.to_string())
}

/// Entry description is its summary, or the rendered body without one.
fn entry_to_item(entry: &FeedEntry) -> rss::Item {
    ItemBuilder::default()
        .title(Some(entry.title.to_owned()))
        .link(entry.link.clone())
        .guid(Some(
            GuidBuilder::default()
                .permalink(false)
                .value(entry.id.clone())
                .build(),
        ))
        .description(Some(entry.summary.unwrap_or(entry.content).to_owned()))
        .pub_date(entry.published.map(DateTimeUtc::to_rfc2822))
        .author(entry.author.map(str::to_owned))
        .build()
}
