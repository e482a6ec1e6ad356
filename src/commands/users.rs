//! `taskerize users` command.

use crate::context::ServiceContext;
use crate::model::User;

/// Execute the `users` command.
///
/// Prints a table of the users tasks can be assigned to.
///
/// # Errors
///
/// Returns an error string if the user service cannot be reached.
pub async fn run(ctx: &ServiceContext) -> Result<(), String> {
    let users = ctx.gateway.list_users().await.map_err(|e| e.to_string())?;
    if users.is_empty() {
        println!("No users found.");
        return Ok(());
    }
    print!("{}", render(&users));
    Ok(())
}

fn render(users: &[User]) -> String {
    let id_width = users.iter().map(|u| u.id.len()).max().unwrap_or(2).max(2);
    let name_width = users.iter().map(|u| u.name.len()).max().unwrap_or(4).max(4);

    let mut out = format!("{:<id_width$}  {:<name_width$}  EMAIL\n", "ID", "NAME");
    out.push_str(&format!("{:-<id_width$}  {:-<name_width$}  -----\n", "", ""));
    for user in users {
        out.push_str(&format!("{:<id_width$}  {:<name_width$}  {}\n", user.id, user.name, user.email));
    }
    out.push_str(&format!("\n{} user(s) total.\n", users.len()));
    out
}
