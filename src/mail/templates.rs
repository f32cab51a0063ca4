use crate::models::reservation::Reservation;

pub const RESTAURANT_NAME: &str = "Golden Palace Restaurant";
pub const RESTAURANT_ADDRESS: &str = "Kathmandu, Nepal";
pub const RESTAURANT_PHONE: &str = "+977-XXXXXXXXX";

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EmailMessage {
    pub subject: String,
    pub html: String,
}

/// What the customer is told about their booking.
#[derive(Clone, Copy, Debug)]
pub struct ConfirmationDetails<'a> {
    pub date: &'a str,
    pub time: &'a str,
    pub guests: Option<u32>,
}

impl<'a> From<&'a Reservation> for ConfirmationDetails<'a> {
    fn from(reservation: &'a Reservation) -> Self {
        Self {
            date: &reservation.date,
            time: &reservation.time,
            guests: reservation.guests,
        }
    }
}

pub fn reservation_confirmation(customer_name: &str, details: ConfirmationDetails<'_>) -> EmailMessage {
    let guests = details
        .guests
        .map(|g| g.to_string())
        .unwrap_or_else(|| "Not specified".to_string());

    let html = format!(
        r#"
<div style="font-family: Arial, sans-serif; max-width: 600px; margin: 0 auto;">
  <h2 style="color: #d4af37; text-align: center;">{restaurant}</h2>
  <h3>Reservation Confirmation</h3>
  <p>Dear {name},</p>
  <p>Thank you for making a reservation at {restaurant}. Here are your reservation details:</p>

  <div style="background-color: #f9f9f9; padding: 15px; border-radius: 5px; margin: 20px 0;">
    <p><strong>Date:</strong> {date}</p>
    <p><strong>Time:</strong> {time}</p>
    <p><strong>Number of Guests:</strong> {guests}</p>
  </div>

  <p>We look forward to serving you!</p>

  <div style="margin-top: 30px; padding-top: 20px; border-top: 1px solid #eee;">
    <p><strong>{restaurant}</strong></p>
    <p>{address}</p>
    <p>Phone: {phone}</p>
  </div>
</div>
"#,
        restaurant = RESTAURANT_NAME,
        name = escape_html(customer_name),
        date = escape_html(details.date),
        time = escape_html(details.time),
        guests = guests,
        address = RESTAURANT_ADDRESS,
        phone = RESTAURANT_PHONE,
    );

    EmailMessage {
        subject: format!("Reservation Confirmation - {}", RESTAURANT_NAME),
        html,
    }
}

pub fn reservation_notification(reservation: &Reservation) -> EmailMessage {
    let html = format!(
        r#"
<div style="font-family: Arial, sans-serif; max-width: 600px; margin: 0 auto;">
  <h2 style="color: #d4af37;">New Reservation Received</h2>
  <p>A new reservation has been made at {restaurant}. Here are the details:</p>

  <div style="background-color: #f9f9f9; padding: 15px; border-radius: 5px; margin: 20px 0;">
    <p><strong>Customer Name:</strong> {first_name} {last_name}</p>
    <p><strong>Email:</strong> {email}</p>
    <p><strong>Phone:</strong> {phone}</p>
    <p><strong>Date:</strong> {date}</p>
    <p><strong>Time:</strong> {time}</p>
    <p><strong>Reference:</strong> {id}</p>
  </div>

  <p>Please ensure all details are correct and prepare accordingly.</p>
</div>
"#,
        restaurant = RESTAURANT_NAME,
        first_name = escape_html(&reservation.first_name),
        last_name = escape_html(&reservation.last_name),
        email = escape_html(&reservation.email),
        phone = escape_html(&reservation.phone),
        date = escape_html(&reservation.date),
        time = escape_html(&reservation.time),
        id = reservation.id,
    );

    EmailMessage {
        subject: format!("New Reservation - {}", RESTAURANT_NAME),
        html,
    }
}

fn escape_html(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}
