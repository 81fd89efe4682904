use iced::Subscription;

use crate::message::Message;

/// Display frames for the gauge animation.
///
/// Only subscribe while an animation runs; an idle dashboard needs no
/// redraws.
pub fn gauge_frames() -> Subscription<Message> {
    iced::window::frames().map(Message::GaugeFrame)
}
