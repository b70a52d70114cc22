//! Text of the notifications and replies the bot sends.

use crate::common::Notification;
use crate::gear::GearSite;

/// Embed for a gear check forwarded to officers.
pub fn gear_check_notification(
    display_name: &str,
    channel_name: &str,
    jump_url: &str,
    character_name: &str,
    raid_logs_url: Option<&str>,
) -> Notification {
    let logs_line = match raid_logs_url {
        Some(url) => format!("Please also check their [raid logs]({}).", url),
        None => format!(
            "Raid logs could not be retrieved for character: {}",
            character_name
        ),
    };
    Notification::new(
        format!(
            "{} just submitted a gear check request in {}:",
            display_name, channel_name
        ),
        format!("You can view it [here]({}). \n{}", jump_url, logs_line),
    )
}

/// Embed for a buff broadcast, followed by `mention`.
pub fn buff_alert_notification(content: &str, jump_url: &str, mention: &str) -> Notification {
    Notification::new(
        "A buff is dropping!",
        format!("{} \n[Go here for more info.]({})", content, jump_url),
    )
    .with_mention(mention)
}

pub fn private_link_reply(author_mention: &str) -> String {
    format!(
        "{} your link was private. Please post the public link to your gear set.",
        author_mention
    )
}

pub fn preferred_site_reply(author_mention: &str, used: GearSite) -> String {
    format!(
        "{} Please use https://sixtyupgrades.com/ to post your gear instead of {}. \
         Doing this lets us know you know how to follow directions and helps us with our decision making. Thanks!",
        author_mention,
        used.name()
    )
}
