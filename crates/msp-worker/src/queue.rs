//! AMQP 0-9-1 transport: connect, declare the two durable queues, set
//! prefetch, and publish persistent messages. Kept as free functions over
//! a borrowed `Channel` rather than a wrapper struct, since amiquip's
//! `Queue<'_>` already borrows the channel that created it and a worker
//! needs both alive for its whole run.

use amiquip::{
    Channel, Connection, Exchange, Publish, Queue as AmqpQueue, QueueDeclareOptions,
};

use crate::config::Config;
use crate::error::WorkerResult;

pub fn connect(config: &Config) -> WorkerResult<Connection> {
    let url = format!(
        "amqp://{}:{}@{}:{}",
        config.rabbitmq_user, config.rabbitmq_pass, config.rabbitmq_host, config.rabbitmq_port
    );
    tracing::info!(host = %config.rabbitmq_host, port = config.rabbitmq_port, "connecting to RabbitMQ");
    let connection = Connection::insecure_open(&url)?;
    Ok(connection)
}

pub fn declare_durable<'a>(channel: &'a Channel, name: &str) -> WorkerResult<AmqpQueue<'a>> {
    let queue = channel.queue_declare(
        name,
        QueueDeclareOptions {
            durable: true,
            ..QueueDeclareOptions::default()
        },
    )?;
    Ok(queue)
}

pub fn publish_persistent(channel: &Channel, queue_name: &str, body: &[u8]) -> WorkerResult<()> {
    let exchange = Exchange::direct(channel);
    exchange.publish(Publish::with_properties(
        body,
        queue_name,
        amiquip::AmqpProperties::default().with_delivery_mode(2),
    ))?;
    Ok(())
}
