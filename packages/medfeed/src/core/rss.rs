use rss::{ChannelBuilder, Guid, ItemBuilder};
use time::format_description::well_known::Rfc2822;

use super::{SiteFeed, item::FeedItem};
use crate::Error;

pub const LANGUAGE: &str = "ja";
pub const GENERATOR: &str = concat!("medfeed ", env!("CARGO_PKG_VERSION"));
pub const DOCS: &str = "http://www.rssboard.org/rss-specification";

impl TryFrom<&FeedItem> for rss::Item {
    type Error = time::error::Format;

    fn try_from(item: &FeedItem) -> Result<Self, Self::Error> {
        let pub_date = item
            .published_at
            .map(|at| at.format(&Rfc2822))
            .transpose()?;

        Ok(ItemBuilder::default()
            .title(item.title.clone())
            .link(item.link.clone())
            .description(item.description.clone())
            .guid(Guid {
                value: item.guid.clone(),
                permalink: item.is_permalink(),
            })
            .pub_date(pub_date)
            .build())
    }
}

impl SiteFeed {
    pub fn to_rss(&self) -> Result<rss::Channel, Error> {
        let items = self
            .items
            .iter()
            .map(rss::Item::try_from)
            .collect::<Result<Vec<_>, _>>()?;

        Ok(ChannelBuilder::default()
            .title(self.title.clone())
            .link(self.link.clone())
            .description(self.description.clone())
            .language(LANGUAGE.to_string())
            .generator(GENERATOR.to_string())
            .docs(DOCS.to_string())
            .last_build_date(self.generated_at.format(&Rfc2822)?)
            .items(items)
            .build())
    }
}
