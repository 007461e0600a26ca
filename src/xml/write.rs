use quick_xml::{
    Writer,
    events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event},
};
use tracing::debug;

use crate::model::{Context, Item, Month, Project};

use super::{XmlError, tags};

const INDENT: usize = 2;

type XmlWriter = Writer<Vec<u8>>;

/// Encodes `context` as an hours file.
///
/// Empty containers are left out, so are zero hours. Hours are written with two decimals.
pub fn write(context: &Context) -> Result<String, XmlError> {
    let mut writer = Writer::new_with_indent(Vec::new(), b' ', INDENT);

    writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;
    writer.write_event(Event::Start(BytesStart::new(tags::HOURGLASS)))?;
    write_projects(&mut writer, context)?;
    write_months(&mut writer, context)?;
    writer.write_event(Event::End(BytesEnd::new(tags::HOURGLASS)))?;

    let mut xml =
        String::from_utf8(writer.into_inner()).map_err(|e| XmlError::Malformed(e.to_string()))?;
    xml.push('\n');

    debug!("Wrote {} bytes of XML", xml.len());
    Ok(xml)
}

fn write_text_element(writer: &mut XmlWriter, name: &str, text: &str) -> Result<(), XmlError> {
    writer.write_event(Event::Start(BytesStart::new(name)))?;
    writer.write_event(Event::Text(BytesText::new(text)))?;
    writer.write_event(Event::End(BytesEnd::new(name)))?;
    Ok(())
}

fn start_with_id(name: &str, key: &str, id: impl ToString) -> BytesStart<'static> {
    let mut start = BytesStart::new(name.to_string());
    start.push_attribute((key, id.to_string().as_str()));
    start
}

fn write_projects(writer: &mut XmlWriter, context: &Context) -> Result<(), XmlError> {
    let projects = context.list_projects();
    if projects.is_empty() {
        return Ok(());
    }

    writer.write_event(Event::Start(BytesStart::new(tags::PROJECTS)))?;
    for project in projects.into_iter().filter_map(|id| context.find_project(id)) {
        write_project(writer, project)?;
    }
    writer.write_event(Event::End(BytesEnd::new(tags::PROJECTS)))?;
    Ok(())
}

fn write_project(writer: &mut XmlWriter, project: &Project) -> Result<(), XmlError> {
    writer.write_event(Event::Start(start_with_id(
        tags::PROJECT,
        tags::PROJECT_ID,
        project.id(),
    )))?;
    write_text_element(writer, tags::NAME, &project.name)?;
    write_text_element(writer, tags::ANNOTATION, &project.annotation)?;
    writer.write_event(Event::End(BytesEnd::new(tags::PROJECT)))?;
    Ok(())
}

fn write_months(writer: &mut XmlWriter, context: &Context) -> Result<(), XmlError> {
    let months = context.list_months();
    if months.is_empty() {
        return Ok(());
    }

    writer.write_event(Event::Start(BytesStart::new(tags::MONTHS)))?;
    for month in months.into_iter().filter_map(|id| context.find_month(id)) {
        write_month(writer, month)?;
    }
    writer.write_event(Event::End(BytesEnd::new(tags::MONTHS)))?;
    Ok(())
}

fn write_month(writer: &mut XmlWriter, month: &Month) -> Result<(), XmlError> {
    let start = start_with_id(tags::MONTH, tags::MONTH_ID, month.id());
    if month.items.is_empty() {
        writer.write_event(Event::Empty(start))?;
        return Ok(());
    }

    writer.write_event(Event::Start(start))?;
    writer.write_event(Event::Start(BytesStart::new(tags::ITEMS)))?;
    for item in &month.items {
        write_item(writer, item)?;
    }
    writer.write_event(Event::End(BytesEnd::new(tags::ITEMS)))?;
    writer.write_event(Event::End(BytesEnd::new(tags::MONTH)))?;
    Ok(())
}

fn write_item(writer: &mut XmlWriter, item: &Item) -> Result<(), XmlError> {
    writer.write_event(Event::Start(start_with_id(
        tags::ITEM,
        tags::PROJECT_ID,
        item.project_id,
    )))?;
    write_text_element(writer, tags::ACTIVITY, &item.activity)?;

    if !item.hours.is_zero() {
        writer.write_event(Event::Start(BytesStart::new(tags::HOURS)))?;
        for (slot, hours) in item.hours.iter().filter(|(_, hours)| *hours != 0.) {
            writer.write_event(Event::Start(start_with_id(tags::DAY, tags::DAY_ID, slot)))?;
            writer.write_event(Event::Text(BytesText::new(&format!("{hours:.2}"))))?;
            writer.write_event(Event::End(BytesEnd::new(tags::DAY)))?;
        }
        writer.write_event(Event::End(BytesEnd::new(tags::HOURS)))?;
    }

    writer.write_event(Event::End(BytesEnd::new(tags::ITEM)))?;
    Ok(())
}
