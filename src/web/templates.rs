//! # Templates Maud — HTML Server-Side Rendering
//!
//! A página do chat é renderizada em tempo de compilação com
//! [`maud`](https://maud.lambda.xyz/). A conversa em si é JSON: o script
//! inline envia `POST /chat`, guarda o `session_id` devolvido e pinta as
//! respostas com a intenção e a confiança de cada frase.
//!
//! ## Layout
//!
//! ```text
//! ┌──────────────── nav-bar ──────────────────┐
//! │ 🍕 Pizzaria             ● pronto         │
//! ├───────────────────────────────────────────┤
//! │  Boas-vindas                             │
//! │  Mensagens (usuário / atendente)         │
//! │  intenções + confiança                   │
//! ├───────────────────────────────────────────┤
//! │ [↺ Nova conversa] [_____________][Enviar] │
//! └───────────────────────────────────────────┘
//! ```

use maud::{html, Markup, PreEscaped, DOCTYPE};

/// Página principal do chat.
pub fn full_page() -> Markup {
    html! {
        (DOCTYPE)
        html lang="pt-BR" {
            head {
                meta charset="UTF-8";
                meta name="viewport" content="width=device-width, initial-scale=1.0";
                title { "Pizzaria — Atendimento" }
                link rel="stylesheet" href="/assets/style.css";
            }
            body {
                div class="app-shell" {
                    nav class="nav-bar" {
                        a href="/" class="nav-brand" {
                            span class="nav-brand-icon" { "🍕" }
                            span class="nav-brand-text" { "Pizzaria" }
                        }
                        div class="nav-status" id="nav-status" {
                            span class="nav-status-dot loading" id="status-dot" {}
                            span id="status-text" { "carregando..." }
                        }
                    }

                    div class="chat-panel" {
                        div id="chat-messages" class="chat-messages" {
                            div class="message system-message welcome" {
                                div class="message-content" {
                                    div class="welcome-title" { "Bem-vindo à nossa pizzaria!" }
                                    p {
                                        "Pergunte sobre o cardápio, preços, entrega ou os "
                                        "ingredientes de qualquer sabor."
                                    }
                                }
                            }
                        }

                        div class="chat-input-area" {
                            button id="reset-btn" class="secondary-btn" type="button" {
                                "↺ Nova conversa"
                            }
                            form id="chat-form" {
                                input type="text" name="message" id="message-input"
                                    placeholder="Digite sua mensagem..."
                                    autocomplete="off"
                                    autofocus;
                                button type="submit" { "Enviar" }
                            }
                        }
                    }
                }

                script { (PreEscaped(CHAT_SCRIPT)) }
            }
        }
    }
}

const CHAT_SCRIPT: &str = r#"
const messages = document.getElementById('chat-messages');
const form = document.getElementById('chat-form');
const input = document.getElementById('message-input');
let sessionId = sessionStorage.getItem('session_id');

function append(role, text, meta) {
  const div = document.createElement('div');
  div.className = 'message ' + (role === 'user' ? 'user-message' : 'system-message');
  const content = document.createElement('div');
  content.className = 'message-content';
  content.textContent = text;
  div.appendChild(content);
  if (meta) {
    const info = document.createElement('div');
    info.className = 'message-meta';
    info.textContent = meta;
    div.appendChild(info);
  }
  messages.appendChild(div);
  messages.scrollTop = messages.scrollHeight;
}

form.addEventListener('submit', async (event) => {
  event.preventDefault();
  const text = input.value.trim();
  if (!text) return;
  append('user', text);
  input.value = '';
  const body = { message: text };
  if (sessionId) body.session_id = sessionId;
  try {
    const res = await fetch('/chat', {
      method: 'POST',
      headers: { 'Content-Type': 'application/json' },
      body: JSON.stringify(body),
    });
    const data = await res.json();
    if (data.error) {
      append('system', '⚠ ' + data.error);
      return;
    }
    sessionId = data.session_id;
    sessionStorage.setItem('session_id', sessionId);
    append('system', data.response, data.intents + ' · confiança média ' + data.confidence + '%');
  } catch (e) {
    append('system', '⚠ Falha de conexão');
  }
});

document.getElementById('reset-btn').addEventListener('click', async () => {
  if (sessionId) {
    await fetch('/session/reset', {
      method: 'POST',
      headers: { 'Content-Type': 'application/json' },
      body: JSON.stringify({ session_id: sessionId }),
    });
  }
  sessionId = null;
  sessionStorage.removeItem('session_id');
  append('system', 'Conversa reiniciada.');
});

async function pollStatus() {
  try {
    const res = await fetch('/status');
    const data = await res.json();
    if (data.ready) {
      document.getElementById('status-dot').className = 'nav-status-dot ready';
      document.getElementById('status-text').textContent = 'pronto';
      return;
    }
  } catch (e) {}
  setTimeout(pollStatus, 3000);
}
pollStatus();
"#;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn page_has_form_and_script() {
        let page = full_page().into_string();
        assert!(page.starts_with("<!DOCTYPE html>"));
        assert!(page.contains("id=\"chat-form\""));
        assert!(page.contains("fetch('/chat'"));
    }
}
