use application::RegistryApp;
use domain::{DonorProfileRequest, NewEmergencyContact, Registration};

/// Walks one donor through registration, login, profile completion and the dashboard,
/// against a throwaway in-memory database.
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("🩸 Blood donation registry");
    println!("Flow: register → login → donor profile → contacts → dashboard");

    let app = RegistryApp::in_memory()?;

    let user = app
        .user_service
        .register(Registration {
            name: "Ada".to_string(),
            email: "ada@example.com".to_string(),
            password: "correct horse".to_string(),
        })
        .await?;
    println!("📝 Registered {} with id {:?}", user.email, user.id);

    let outcome = app.user_service.login("ada@example.com", "correct horse").await?;
    println!("🔑 Logged in, profile completed: {}", outcome.profile_completed());

    let donor = app
        .profile_service
        .complete_donor_profile(DonorProfileRequest {
            email: "ada@example.com".to_string(),
            blood_group: "ab-".to_string(),
            date_of_birth: None,
            gender: "female".to_string(),
            mobile: Some("0123456789".to_string()),
            home_phone: None,
            emergency_contacts: vec![NewEmergencyContact::new(
                "Grace",
                "9876543210",
                "grace@example.com",
                "Friend",
            )?],
        })
        .await?;
    println!("💉 Donor profile stored with blood type {}", donor.blood_type);

    let extra = NewEmergencyContact::new("Alan", "5550001111", "alan@example.com", "Colleague")?;
    app.contact_service.add_contacts(donor.user_id, vec![extra.clone()]).await?;

    match app.contact_service.add_contacts(donor.user_id, vec![extra]).await {
        Ok(_) => println!("⚠️  Third contact was accepted"),
        Err(e) => println!("🚫 Third contact rejected: {}", e),
    }

    let profile = app.dashboard_service.load_profile(donor.user_id).await?;
    println!("📋 Dashboard for {}:", profile.user.name);
    println!("  blood type: {:?}", profile.blood_type().map(|b| b.as_str()));
    println!("  rh factor:  {:?}", profile.rh_factor());
    for contact in &profile.emergency_contacts {
        println!("  contact:    {} ({})", contact.name, contact.relation);
    }

    Ok(())
}
