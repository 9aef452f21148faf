//! XMLTV document writer.

use chrono::NaiveDateTime;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;
use std::io::Write;

use super::GuideWriter;
use crate::config::OutputSettings;
use crate::error::EmitError;
use crate::scheduler::ChannelId;
use crate::timeline::Guide;

const TIMESTAMP_FORMAT: &str = "%Y%m%d%H%M%S";
const GENERATOR: &str = "sportsguide";

/// Writes `<tv>` with one `<channel>` per pool slot and one `<programme>`
/// per timeline block.
#[derive(Debug, Clone)]
pub struct XmltvWriter {
    channel_id_prefix: String,
    channel_name_prefix: String,
    filler_title: String,
    title_lang: String,
}

impl XmltvWriter {
    pub fn new(output: &OutputSettings) -> Self {
        Self {
            channel_id_prefix: output.channel_id_prefix.clone(),
            channel_name_prefix: output.channel_name_prefix.clone(),
            filler_title: output.filler_title.clone(),
            title_lang: output.title_lang.clone(),
        }
    }

    /// `"<prefix><n>"`, e.g. `peacocksports3`.
    pub fn channel_id(&self, id: ChannelId) -> String {
        format!("{}{}", self.channel_id_prefix, id)
    }

    /// `"<Prefix> <n>"`, e.g. `Peacock Sports 3`.
    pub fn display_name(&self, id: ChannelId) -> String {
        format!("{} {}", self.channel_name_prefix, id)
    }
}

fn timestamp(ts: NaiveDateTime) -> String {
    ts.format(TIMESTAMP_FORMAT).to_string()
}

fn emit<W: Write>(writer: &mut Writer<W>, event: Event<'_>) -> Result<(), EmitError> {
    writer
        .write_event(event)
        .map_err(|e| EmitError::Xml(e.to_string()))
}

fn emit_text_element<W: Write>(
    writer: &mut Writer<W>,
    start: BytesStart<'_>,
    text: &str,
) -> Result<(), EmitError> {
    let end = start.to_end().into_owned();
    emit(writer, Event::Start(start))?;
    emit(writer, Event::Text(BytesText::new(text)))?;
    emit(writer, Event::End(end))
}

impl GuideWriter for XmltvWriter {
    fn write(&self, guide: &Guide, out: &mut dyn Write) -> Result<(), EmitError> {
        let mut writer = Writer::new_with_indent(out, b' ', 2);

        emit(
            &mut writer,
            Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)),
        )?;

        let mut tv = BytesStart::new("tv");
        tv.push_attribute(("generator-info-name", GENERATOR));
        emit(&mut writer, Event::Start(tv))?;

        for channel in &guide.channels {
            let id = self.channel_id(channel.id);
            let mut element = BytesStart::new("channel");
            element.push_attribute(("id", id.as_str()));
            emit(&mut writer, Event::Start(element))?;
            emit_text_element(
                &mut writer,
                BytesStart::new("display-name"),
                &self.display_name(channel.id),
            )?;
            emit(&mut writer, Event::End(BytesEnd::new("channel")))?;
        }

        for channel in &guide.channels {
            let id = self.channel_id(channel.id);
            for block in &channel.blocks {
                let start = timestamp(block.start);
                let stop = timestamp(block.end);
                let mut programme = BytesStart::new("programme");
                programme.push_attribute(("start", start.as_str()));
                programme.push_attribute(("stop", stop.as_str()));
                programme.push_attribute(("channel", id.as_str()));
                emit(&mut writer, Event::Start(programme))?;

                let mut title = BytesStart::new("title");
                title.push_attribute(("lang", self.title_lang.as_str()));
                emit_text_element(&mut writer, title, block.title(&self.filler_title))?;

                emit(&mut writer, Event::End(BytesEnd::new("programme")))?;
            }
        }

        emit(&mut writer, Event::End(BytesEnd::new("tv")))?;
        writer.into_inner().write_all(b"\n")?;
        Ok(())
    }
}
