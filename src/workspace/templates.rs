//! Template renderers for generated workspace files
//!
//! The textual bodies are collaborators of the pipeline, not part of it:
//! each renderer takes the resolved values and embeds them verbatim.

/// Agent server source, wired to the planted model and port
pub fn agent_server(model: &str, agent_name: &str, port: u16) -> String {
    format!(
        r#"// Generated by llamafarm - do not edit
const http = require('http');
const fs = require('fs');

const AGENT_NAME = '{agent_name}';
const MODEL = '{model}';
const PORT = process.env.PORT || {port};

const server = http.createServer((req, res) => {{
  if (req.url === '/health') {{
    res.writeHead(200, {{ 'Content-Type': 'application/json' }});
    res.end(JSON.stringify({{ agent: AGENT_NAME, model: MODEL, status: 'ok' }}));
    return;
  }}
  if (req.url === '/') {{
    res.writeHead(200, {{ 'Content-Type': 'text/html' }});
    res.end(fs.readFileSync(__dirname + '/index.html'));
    return;
  }}
  res.writeHead(404);
  res.end();
}});

server.listen(PORT, () => {{
  console.log(`${{AGENT_NAME}} serving ${{MODEL}} on port ${{PORT}}`);
}});
"#
    )
}

/// Chat UI markup for the planted agent
pub fn chat_ui(model: &str, agent_name: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="utf-8">
  <title>{agent_name}</title>
  <style>
    body {{ font-family: system-ui, sans-serif; max-width: 720px; margin: 2rem auto; }}
    #log {{ border: 1px solid #ccc; border-radius: 8px; min-height: 320px; padding: 1rem; }}
    #prompt {{ width: 100%; padding: 0.5rem; margin-top: 0.5rem; }}
  </style>
</head>
<body>
  <h1>🌾 {agent_name}</h1>
  <p>Model: <code>{model}</code></p>
  <div id="log"></div>
  <input id="prompt" placeholder="Ask {agent_name} anything...">
</body>
</html>
"#
    )
}

/// Container recipe for the workspace
pub fn dockerfile(model: &str, port: u16) -> String {
    format!(
        r#"# Generated by llamafarm for model {model}
FROM node:20-slim

WORKDIR /farm
COPY . .

EXPOSE {port}
ENV PORT={port}

CMD ["node", "agent-server.js"]
"#
    )
}

/// Launch script with resolved values embedded verbatim
pub fn start_script(model: &str, agent_name: &str, port: u16, device: &str) -> String {
    format!(
        r#"#!/bin/sh
# Generated by llamafarm
echo "Starting {agent_name} ({model}) on {device}, port {port}"
PORT={port} exec node agent-server.js
"#
    )
}

/// Build script. Native compilation is not performed; the binary size
/// reported here is a fixed placeholder.
pub fn build_script(model: &str, device: &str) -> String {
    format!(
        r#"#!/bin/sh
# Generated by llamafarm
echo "Building {model} bundle for {device}..."
echo "Optimizing for {device} (skipped: native build not included)"
echo "Binary size: 42 MB"
echo "Done."
"#
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_agent_server_embeds_values() {
        let src = agent_server("llama2", "farm-assistant", 4242);
        assert!(src.contains("const MODEL = 'llama2';"));
        assert!(src.contains("const AGENT_NAME = 'farm-assistant';"));
        assert!(src.contains("4242"));
    }

    #[test]
    fn test_chat_ui_embeds_values() {
        let html = chat_ui("mistral", "harvester");
        assert!(html.contains("<code>mistral</code>"));
        assert!(html.contains("harvester"));
    }

    #[test]
    fn test_scripts_embed_values_verbatim() {
        let start = start_script("phi", "farm-assistant", 9090, "mac");
        assert!(start.starts_with("#!/bin/sh"));
        assert!(start.contains("PORT=9090"));
        assert!(start.contains("phi"));
        assert!(start.contains("mac"));

        let build = build_script("phi", "mac");
        assert!(build.contains("for mac"));
        assert!(build.contains("Binary size: 42 MB"));
    }

    #[test]
    fn test_dockerfile_exposes_port() {
        let docker = dockerfile("codellama", 8088);
        assert!(docker.contains("EXPOSE 8088"));
        assert!(docker.contains("codellama"));
    }
}
