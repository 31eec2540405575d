//! Interactive terminal prompts

use dialoguer::{console, theme::ColorfulTheme, Confirm, Input, Select};

use crate::booking::{BookingRecord, MARKET_SEGMENTS, MEAL_PLANS, ROOM_TYPES};

pub fn theme() -> ColorfulTheme {
    ColorfulTheme {
        active_item_prefix: console::style("  ›".to_string()).for_stderr().cyan(),
        active_item_style: console::Style::new().for_stderr().white().bold(),
        inactive_item_prefix: console::style("   ".to_string()).for_stderr(),
        inactive_item_style: console::Style::new().for_stderr().color256(245),
        prompt_prefix: console::style("  ?".to_string()).for_stderr().color256(111),
        prompt_style: console::Style::new().for_stderr().white().bold(),
        ..ColorfulTheme::default()
    }
}

fn count(theme: &ColorfulTheme, prompt: &str, initial: u32) -> anyhow::Result<u32> {
    Ok(Input::<u32>::with_theme(theme)
        .with_prompt(prompt)
        .default(initial)
        .interact_text()?)
}

fn choice(theme: &ColorfulTheme, prompt: &str, options: &[&str], initial: &str) -> anyhow::Result<String> {
    let default = options.iter().position(|o| *o == initial).unwrap_or(0);
    let index = Select::with_theme(theme)
        .with_prompt(prompt)
        .items(options)
        .default(default)
        .interact()?;
    Ok(options[index].to_string())
}

fn flag(theme: &ColorfulTheme, prompt: &str, initial: u8) -> anyhow::Result<u8> {
    let answer = Confirm::with_theme(theme)
        .with_prompt(prompt)
        .default(initial == 1)
        .interact()?;
    Ok(u8::from(answer))
}

/// Ask for every booking field, starting from `initial`
pub fn booking_form(theme: &ColorfulTheme, initial: &BookingRecord) -> anyhow::Result<BookingRecord> {
    let lead_time = count(theme, "Lead time (days)", initial.lead_time)?;
    let no_of_adults = count(theme, "Adults", initial.no_of_adults)?;
    let no_of_children = count(theme, "Children", initial.no_of_children)?;
    let no_of_weekend_nights = count(theme, "Weekend nights", initial.no_of_weekend_nights)?;
    let no_of_week_nights = count(theme, "Week nights", initial.no_of_week_nights)?;
    let type_of_meal_plan = choice(theme, "Meal plan", &MEAL_PLANS, &initial.type_of_meal_plan)?;
    let room_type_reserved = choice(theme, "Room type", &ROOM_TYPES, &initial.room_type_reserved)?;
    let market_segment_type = choice(theme, "Market segment", &MARKET_SEGMENTS, &initial.market_segment_type)?;
    let required_car_parking_space = flag(theme, "Needs parking?", initial.required_car_parking_space)?;
    let repeated_guest = flag(theme, "Repeated guest?", initial.repeated_guest)?;
    let no_of_previous_cancellations =
        count(theme, "Previous cancellations", initial.no_of_previous_cancellations)?;
    let no_of_previous_bookings_not_canceled = count(
        theme,
        "Previous bookings kept",
        initial.no_of_previous_bookings_not_canceled,
    )?;
    let avg_price_per_room = Input::<f64>::with_theme(theme)
        .with_prompt("Average room price")
        .default(initial.avg_price_per_room)
        .validate_with(|price: &f64| {
            if price.is_finite() && *price >= 0.0 {
                Ok(())
            } else {
                Err("price must be a non-negative number")
            }
        })
        .interact_text()?;
    let no_of_special_requests = count(theme, "Special requests", initial.no_of_special_requests)?;

    Ok(BookingRecord {
        lead_time,
        no_of_adults,
        no_of_children,
        no_of_weekend_nights,
        no_of_week_nights,
        type_of_meal_plan,
        room_type_reserved,
        market_segment_type,
        required_car_parking_space,
        repeated_guest,
        no_of_previous_cancellations,
        no_of_previous_bookings_not_canceled,
        avg_price_per_room,
        no_of_special_requests,
        arrival_year: initial.arrival_year,
        arrival_month: initial.arrival_month,
        arrival_date: initial.arrival_date,
    })
}

pub fn confirm(theme: &ColorfulTheme, prompt: &str, default: bool) -> anyhow::Result<bool> {
    Ok(Confirm::with_theme(theme)
        .with_prompt(prompt)
        .default(default)
        .interact()?)
}
