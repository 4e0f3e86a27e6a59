// herald-core/src/platforms/discord/transport.rs
//
// ChatTransport implementation over twilight-http. Every twilight error is
// classified into a TransportError at this boundary; nothing above it sees a
// vendor type.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::debug;
use twilight_http::Client as HttpClient;
use twilight_http::error::ErrorType;
use twilight_http::response::DeserializeBodyError;
use twilight_model::channel::Channel;
use twilight_model::channel::message::Embed as DiscordEmbed;
use twilight_model::guild::Permissions;
use twilight_model::http::permission_overwrite::{PermissionOverwrite, PermissionOverwriteType};
use twilight_model::id::Id;
use twilight_model::id::marker::{ChannelMarker, GenericMarker};
use twilight_model::util::Timestamp;
use twilight_util::builder::embed::{
    EmbedAuthorBuilder, EmbedBuilder, EmbedFieldBuilder, EmbedFooterBuilder, ImageSource,
};

use herald_common::models::message::{Embed, OutboundMessage};

use crate::platforms::{ChannelInfo, ChatTransport, Destination, TransportError};

impl From<twilight_http::Error> for TransportError {
    fn from(err: twilight_http::Error) -> Self {
        let status = match err.kind() {
            ErrorType::Response { status, .. } => Some(status.get()),
            ErrorType::Unauthorized => Some(401),
            _ => None,
        };
        match status {
            Some(code) => TransportError::from_status(code, err.to_string()),
            None => TransportError::Network(err.to_string()),
        }
    }
}

impl From<DeserializeBodyError> for TransportError {
    fn from(err: DeserializeBodyError) -> Self {
        TransportError::Network(err.to_string())
    }
}

fn parse_channel_id(raw: &str) -> Result<Id<ChannelMarker>, TransportError> {
    raw.parse::<u64>()
        .ok()
        .and_then(Id::<ChannelMarker>::new_checked)
        .ok_or_else(|| TransportError::Rejected(format!("invalid channel id: {raw}")))
}

fn channel_info(channel: &Channel) -> ChannelInfo {
    ChannelInfo {
        id: channel.id.to_string(),
        guild_id: channel.guild_id.map(|id| id.to_string()),
        parent_id: channel.parent_id.map(|id| id.to_string()),
        name: channel.name.clone(),
        is_thread: channel.kind.is_thread(),
    }
}

fn image_source(url: &str) -> Result<ImageSource, TransportError> {
    ImageSource::url(url)
        .map_err(|e| TransportError::Rejected(format!("invalid embed image url: {e}")))
}

/// Convert the vendor-neutral embed into Discord's wire shape.
fn build_embed(embed: &Embed) -> Result<DiscordEmbed, TransportError> {
    let mut builder = EmbedBuilder::new();
    if let Some(title) = &embed.title {
        builder = builder.title(title.clone());
    }
    if let Some(description) = &embed.description {
        builder = builder.description(description.clone());
    }
    if let Some(url) = &embed.url {
        builder = builder.url(url.clone());
    }
    if let Some(color) = embed.color {
        builder = builder.color(color);
    }
    if let Some(ts) = embed.timestamp {
        if let Ok(stamp) = Timestamp::from_secs(ts.timestamp()) {
            builder = builder.timestamp(stamp);
        }
    }
    if let Some(author) = &embed.author {
        let mut author_builder = EmbedAuthorBuilder::new(author.name.clone());
        if let Some(url) = &author.url {
            author_builder = author_builder.url(url.clone());
        }
        if let Some(icon) = &author.icon_url {
            author_builder = author_builder.icon_url(image_source(icon)?);
        }
        builder = builder.author(author_builder.build());
    }
    for field in &embed.fields {
        let mut field_builder =
            EmbedFieldBuilder::new(field.name.clone(), field.value.clone());
        if field.inline {
            field_builder = field_builder.inline();
        }
        builder = builder.field(field_builder.build());
    }
    if let Some(footer) = &embed.footer {
        let mut footer_builder = EmbedFooterBuilder::new(footer.text.clone());
        if let Some(icon) = &footer.icon_url {
            footer_builder = footer_builder.icon_url(image_source(icon)?);
        }
        builder = builder.footer(footer_builder.build());
    }
    if let Some(image) = &embed.image_url {
        builder = builder.image(image_source(image)?);
    }
    if let Some(thumbnail) = &embed.thumbnail_url {
        builder = builder.thumbnail(image_source(thumbnail)?);
    }
    Ok(builder.build())
}

/// Talks to Discord through a shared `twilight_http::Client`.
pub struct TwilightChatTransport {
    http: Arc<HttpClient>,
}

impl TwilightChatTransport {
    pub fn new(http: Arc<HttpClient>) -> Self {
        Self { http }
    }

    async fn channel(&self, id: Id<ChannelMarker>) -> Result<Channel, TransportError> {
        Ok(self.http.channel(id).await?.model().await?)
    }
}

#[async_trait]
impl ChatTransport for TwilightChatTransport {
    async fn fetch_channel(&self, channel_id: &str) -> Result<ChannelInfo, TransportError> {
        let id = parse_channel_id(channel_id)?;
        let channel = self.channel(id).await?;
        Ok(channel_info(&channel))
    }

    async fn fetch_thread(
        &self,
        parent_channel_id: &str,
        thread_id: &str,
    ) -> Result<ChannelInfo, TransportError> {
        let parent = parse_channel_id(parent_channel_id)?;
        let id = parse_channel_id(thread_id)?;
        let channel = self.channel(id).await?;
        let info = channel_info(&channel);
        let expected_parent = parent.to_string();
        if !info.is_thread || info.parent_id.as_deref() != Some(expected_parent.as_str()) {
            return Err(TransportError::NotFound(format!(
                "thread {thread_id} not found under channel {parent_channel_id}"
            )));
        }
        Ok(info)
    }

    async fn set_locked(
        &self,
        destination: &Destination,
        locked: bool,
    ) -> Result<(), TransportError> {
        match destination {
            Destination::Thread(thread) => {
                let id = parse_channel_id(&thread.id)?;
                debug!(
                    "TwilightChatTransport: setting locked={} on thread {}",
                    locked, thread.id
                );
                self.http.update_thread(id).locked(locked).await?;
                Ok(())
            }
            Destination::Channel(chan) => {
                let id = parse_channel_id(&chan.id)?;
                let channel = self.channel(id).await?;
                let guild_id = channel.guild_id.ok_or_else(|| {
                    TransportError::Rejected(format!(
                        "channel {} is not a guild channel",
                        chan.id
                    ))
                })?;
                // The @everyone role id is the guild id. Only the
                // SEND_MESSAGES bit changes; everything else in the
                // overwrite is carried over from the live channel.
                let everyone = guild_id.cast::<GenericMarker>();
                let (mut allow, mut deny) = channel
                    .permission_overwrites
                    .as_deref()
                    .unwrap_or_default()
                    .iter()
                    .find(|o| o.id == everyone)
                    .map(|o| (o.allow, o.deny))
                    .unwrap_or((Permissions::empty(), Permissions::empty()));
                if locked {
                    allow.remove(Permissions::SEND_MESSAGES);
                    deny.insert(Permissions::SEND_MESSAGES);
                } else {
                    deny.remove(Permissions::SEND_MESSAGES);
                }
                debug!(
                    "TwilightChatTransport: setting locked={} on channel {}",
                    locked, chan.id
                );
                self.http
                    .update_channel_permission(
                        id,
                        &PermissionOverwrite {
                            allow: Some(allow),
                            deny: Some(deny),
                            id: everyone,
                            kind: PermissionOverwriteType::Role,
                        },
                    )
                    .await?;
                Ok(())
            }
        }
    }

    async fn set_name(
        &self,
        destination: &Destination,
        name: &str,
    ) -> Result<(), TransportError> {
        let id = parse_channel_id(destination.surface_id())?;
        debug!(
            "TwilightChatTransport: renaming {} to {:?}",
            destination.surface_id(),
            name
        );
        if destination.is_thread() {
            self.http.update_thread(id).name(name).await?;
        } else {
            self.http.update_channel(id).name(name).await?;
        }
        Ok(())
    }

    async fn post_message(
        &self,
        destination: &Destination,
        message: &OutboundMessage,
    ) -> Result<(), TransportError> {
        let id = parse_channel_id(destination.surface_id())?;

        let mut content = String::new();
        if message.mention_everyone {
            content.push_str("@everyone");
        }
        if let Some(text) = &message.content {
            if !content.is_empty() {
                content.push(' ');
            }
            content.push_str(text);
        }

        let embeds = match &message.embed {
            Some(embed) => vec![build_embed(embed)?],
            None => Vec::new(),
        };

        // Discord rejects a create-message with neither content nor embeds;
        // fail it here without making the call.
        if content.is_empty() && embeds.is_empty() {
            return Err(TransportError::Rejected(
                "message has no content and no embeds".to_string(),
            ));
        }

        debug!(
            "TwilightChatTransport: posting message to {}",
            destination.surface_id()
        );
        let mut request = self.http.create_message(id);
        if !content.is_empty() {
            request = request.content(&content);
        }
        if !embeds.is_empty() {
            request = request.embeds(&embeds);
        }
        request.await?;
        Ok(())
    }
}
