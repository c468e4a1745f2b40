//! Server-rendered HTML views
//!
//! Deliberately thin: each page is a function from its context to a body.
//! Form field names (`nome`, `senha`, `confirmSenha`, `papel`, `ativo`) are
//! the wire contract the handlers deserialize.

use axum::response::Html;

use crate::db::entities::user;

fn layout(title: &str, body: &str) -> Html<String> {
    Html(format!(
        "<!DOCTYPE html>\n<html lang=\"pt-BR\">\n<head>\n<meta charset=\"utf-8\">\n\
         <title>{title}</title>\n</head>\n<body>\n{body}\n</body>\n</html>\n"
    ))
}

/// Minimal HTML escaping for user-supplied values
fn escape(value: &str) -> String {
    value
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

pub fn home(user_name: &str) -> Html<String> {
    let body = format!(
        "<h1>Bem-vindo, {}!</h1>\n<p><a href=\"/users\">Gerenciar usu&aacute;rios</a></p>",
        escape(user_name)
    );
    layout("Home", &body)
}

pub fn login() -> Html<String> {
    let body = "<h1>Login</h1>\n\
        <form method=\"post\" action=\"/login\">\n\
        <label>Email <input type=\"email\" name=\"email\"></label><br>\n\
        <label>Senha <input type=\"password\" name=\"senha\"></label><br>\n\
        <button type=\"submit\">Entrar</button>\n\
        </form>";
    layout("Login", body)
}

pub fn user_list(current_user: &str, users: &[user::Model]) -> Html<String> {
    let mut rows = String::new();
    for u in users {
        rows.push_str(&format!(
            "<tr><td>{id}</td><td>{name}</td><td>{email}</td><td>{role}</td>\
             <td>{active}</td>\
             <td><a href=\"/users/{id}/edit\">Editar</a> \
             <button onclick=\"removeUser({id})\">Excluir</button></td></tr>\n",
            id = u.id,
            name = escape(&u.name),
            email = escape(&u.email),
            role = escape(&u.role),
            active = if u.is_active { "Sim" } else { "N&atilde;o" },
        ));
    }

    let body = format!(
        "<h1>Usu&aacute;rios</h1>\n\
         <p>Logado como {current}</p>\n\
         <p><a href=\"/users/add\">Novo usu&aacute;rio</a></p>\n\
         <table border=\"1\">\n\
         <tr><th>ID</th><th>Nome</th><th>Email</th><th>Papel</th><th>Ativo</th><th></th></tr>\n\
         {rows}\
         </table>\n\
         <script>\n\
         function removeUser(id) {{\n\
           fetch('/users/' + id + '/delete', {{ method: 'DELETE' }})\n\
             .then(function () {{ window.location.reload(); }});\n\
         }}\n\
         </script>",
        current = escape(current_user),
    );
    layout("Usuários", &body)
}

pub fn user_add() -> Html<String> {
    let body = "<h1>Novo usu&aacute;rio</h1>\n\
        <form method=\"post\" action=\"/users\">\n\
        <label>Nome <input type=\"text\" name=\"nome\"></label><br>\n\
        <label>Email <input type=\"email\" name=\"email\"></label><br>\n\
        <label>Senha <input type=\"password\" name=\"senha\"></label><br>\n\
        <label>Confirmar senha <input type=\"password\" name=\"confirmSenha\"></label><br>\n\
        <label>Papel <input type=\"text\" name=\"papel\"></label><br>\n\
        <label>Ativo <input type=\"checkbox\" name=\"ativo\" checked></label><br>\n\
        <button type=\"submit\">Salvar</button>\n\
        </form>";
    layout("Novo usuário", body)
}

pub fn user_edit(u: &user::Model) -> Html<String> {
    let body = format!(
        "<h1>Editar usu&aacute;rio</h1>\n\
         <form method=\"post\" action=\"/users/{id}/edit\">\n\
         <label>Nome <input type=\"text\" name=\"nome\" value=\"{name}\"></label><br>\n\
         <label>Email <input type=\"email\" name=\"email\" value=\"{email}\"></label><br>\n\
         <label>Senha <input type=\"password\" name=\"senha\" placeholder=\"manter atual\"></label><br>\n\
         <label>Papel <input type=\"text\" name=\"papel\" value=\"{role}\"></label><br>\n\
         <label>Ativo <input type=\"checkbox\" name=\"ativo\"{checked}></label><br>\n\
         <button type=\"submit\">Salvar</button>\n\
         </form>",
        id = u.id,
        name = escape(&u.name),
        email = escape(&u.email),
        role = escape(&u.role),
        checked = if u.is_active { " checked" } else { "" },
    );
    layout("Editar usuário", &body)
}
