use std::str::FromStr;

use tracing::{debug, trace, warn};

use crate::model::{
    Context, INVALID_MONTH_ID, INVALID_PROJECT_ID, Item, MAX_DAYS, Month, MonthId, NumHour,
    Project, ProjectId,
};

use super::{XmlError, tags, tree::Element};

/// Decodes a whole hours file into a fresh context.
///
/// Missing containers mean "empty". Elements with an unexpected name are skipped. Whether every
/// item references an existing project is left to the caller, see
/// [Context::is_valid](crate::model::Context::is_valid).
pub fn read(xml: &str) -> Result<Context, XmlError> {
    let root = Element::parse(xml)?;
    if root.name != tags::HOURGLASS {
        return Err(XmlError::MissingRoot);
    }

    let mut context = Context::new();
    read_projects(&mut context, &root)?;
    read_months(&mut context, &root)?;
    context.clear_modified();

    debug!(
        "Read {} project(s) and {} month(s)",
        context.list_projects().len(),
        context.list_months().len()
    );
    Ok(context)
}

/// Replaces `context` with the decoded file. On failure `context` is left empty.
pub fn read_into(context: &mut Context, xml: &str) -> Result<(), XmlError> {
    context.clear();
    *context = read(xml)?;
    Ok(())
}

fn attribute_value<T: FromStr>(element: &Element, name: &str) -> Option<T> {
    element
        .attribute(name)
        .map(str::trim)
        .filter(|value| !value.is_empty())?
        .parse()
        .ok()
}

fn read_projects(context: &mut Context, root: &Element) -> Result<(), XmlError> {
    let Some(projects) = root.first_child(tags::PROJECTS) else {
        return Ok(());
    };

    for element in projects.children() {
        if element.name != tags::PROJECT {
            trace!("Skipping <{}> in <{}>", element.name, tags::PROJECTS);
            continue;
        }
        read_project(context, element)?;
    }
    Ok(())
}

fn read_project(context: &mut Context, element: &Element) -> Result<(), XmlError> {
    let id = attribute_value::<ProjectId>(element, tags::PROJECT_ID)
        .filter(|id| *id != INVALID_PROJECT_ID)
        .ok_or(XmlError::InvalidProjectId)?;

    let name = element
        .first_child(tags::NAME)
        .ok_or(XmlError::MissingProjectName(id))?
        .text()
        .trim();
    let annotation = element
        .first_child(tags::ANNOTATION)
        .map_or("", |annotation| annotation.text().trim());

    if !context.add_project(Project::new(id, name).with_annotation(annotation)) {
        return Err(XmlError::RejectedProject(id));
    }
    Ok(())
}

fn read_months(context: &mut Context, root: &Element) -> Result<(), XmlError> {
    let Some(months) = root.first_child(tags::MONTHS) else {
        return Ok(());
    };

    for element in months.children() {
        if element.name != tags::MONTH {
            trace!("Skipping <{}> in <{}>", element.name, tags::MONTHS);
            continue;
        }
        read_month(context, element)?;
    }
    Ok(())
}

fn read_month(context: &mut Context, element: &Element) -> Result<(), XmlError> {
    let id = attribute_value::<MonthId>(element, tags::MONTH_ID)
        .filter(|id| *id != INVALID_MONTH_ID)
        .ok_or(XmlError::InvalidMonthId)?;

    let mut month = Month::from_id(id);
    if !month.is_valid() || context.is_month(id) {
        return Err(XmlError::RejectedMonth(id));
    }

    read_items(&mut month, element)?;

    if !context.add_month(month) {
        return Err(XmlError::RejectedMonth(id));
    }
    Ok(())
}

fn read_items(month: &mut Month, element: &Element) -> Result<(), XmlError> {
    let Some(items) = element.first_child(tags::ITEMS) else {
        return Ok(());
    };

    for element in items.children() {
        if element.name != tags::ITEM {
            trace!("Skipping <{}> in <{}>", element.name, tags::ITEMS);
            continue;
        }
        let item = read_item(month, element)?;
        month.items.push(item);
    }
    Ok(())
}

fn read_item(month: &Month, element: &Element) -> Result<Item, XmlError> {
    let project_id = attribute_value::<ProjectId>(element, tags::PROJECT_ID)
        .filter(|id| *id != INVALID_PROJECT_ID)
        .ok_or(XmlError::InvalidItemProject(month.id()))?;

    let activity = element
        .first_child(tags::ACTIVITY)
        .map_or("", Element::text);

    let mut item = Item::new(project_id).with_activity(activity);
    read_hours(month, &mut item, element)?;
    Ok(item)
}

fn read_hours(month: &Month, item: &mut Item, element: &Element) -> Result<(), XmlError> {
    let Some(hours) = element.first_child(tags::HOURS) else {
        return Ok(());
    };

    for day in hours.children_named(tags::DAY) {
        let slot = attribute_value::<usize>(day, tags::DAY_ID)
            .filter(|slot| *slot < MAX_DAYS)
            .ok_or_else(|| {
                XmlError::InvalidDay(day.attribute(tags::DAY_ID).unwrap_or_default().into())
            })?;

        let text = day.text().trim();
        let value = text
            .parse::<NumHour>()
            .ok()
            .filter(|value| value.is_finite())
            .ok_or_else(|| XmlError::InvalidHours(text.into()))?;

        if slot >= month.days() {
            warn!(
                "Dropping {value} hour(s) booked on day slot {slot} of {month}, which has only {} days",
                month.days()
            );
            continue;
        }
        item.hours.set(slot, value);
    }
    Ok(())
}
