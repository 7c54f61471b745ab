use twilight_model::channel::message::Embed;
use twilight_model::util::Timestamp;
use twilight_util::builder::embed::{EmbedBuilder, EmbedFieldBuilder, EmbedFooterBuilder, ImageSource};

use cfxwatch_common::models::embed::StatusEmbed;

use crate::Error;

/// Builds the Discord embed for a status message.
pub fn to_twilight_embed(embed: &StatusEmbed) -> Result<Embed, Error> {
    let timestamp = Timestamp::from_micros(embed.timestamp.timestamp_micros())
        .map_err(|e| Error::Platform(format!("Invalid embed timestamp: {e}")))?;

    let mut builder = EmbedBuilder::new()
        .title(embed.title.clone())
        .description(embed.description.clone())
        .color(embed.color)
        .timestamp(timestamp);

    for field in &embed.fields {
        let mut field_builder = EmbedFieldBuilder::new(field.name.clone(), field.value.clone());
        if field.inline {
            field_builder = field_builder.inline();
        }
        builder = builder.field(field_builder);
    }

    if let Some(name) = &embed.image {
        let source = ImageSource::attachment(name)
            .map_err(|e| Error::Platform(format!("Invalid embed attachment '{name}': {e}")))?;
        builder = builder.image(source);
    }

    if let Some(text) = &embed.footer {
        builder = builder.footer(EmbedFooterBuilder::new(text.clone()));
    }

    Ok(builder.build())
}
